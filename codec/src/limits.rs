//! Limits for codec-level decoding.

/// Codec-specific limits enforced on every decode pass.
///
/// A group element may have a zero-length block, so a hostile count costs
/// no bytes; these limits bound the work a decoder does per message.
/// `Default` is meant for untrusted input and rejects some valid messages;
/// [`CodecLimits::format_max`] accepts everything the format allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecLimits {
    /// Maximum element count accepted from a group header.
    pub max_group_count: usize,
    /// Maximum declared length of a single var-data payload.
    pub max_var_data_len: usize,
    /// Maximum group elements across all groups of one message.
    pub max_total_elements: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_group_count: wire::MAX_GROUP_COUNT,
            max_var_data_len: 1024 * 1024,
            max_total_elements: 64 * 1024,
        }
    }
}

impl CodecLimits {
    /// Creates limits equal to what the wire format itself can express.
    ///
    /// Any message an encoder can produce decodes under these limits. Each
    /// counted element sits behind a group header in the buffer, so the
    /// element total stays bounded by the input length.
    #[must_use]
    pub const fn format_max() -> Self {
        Self {
            max_group_count: wire::MAX_GROUP_COUNT,
            max_var_data_len: wire::LengthPrefix::U32.max_length(),
            max_total_elements: usize::MAX,
        }
    }

    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_group_count: 1024,
            max_var_data_len: 4096,
            max_total_elements: 4096,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_group_count: usize::MAX,
            max_var_data_len: usize::MAX,
            max_total_elements: usize::MAX,
        }
    }
}
