//! Configurable limits for bounded header decoding.

use crate::error::{DecodeError, LimitKind, WireResult};

/// Wire-level limits for message framing.
///
/// These limits are enforced when a message header is decoded from untrusted
/// input. Group and var-data limits belong to the codec layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum length of one message, header included.
    pub max_message_bytes: usize,

    /// Maximum acting block length accepted from a header.
    pub max_block_length: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            // 1 MiB covers any realistic single message
            max_message_bytes: 1024 * 1024,
            max_block_length: 4096,
        }
    }
}

impl Limits {
    /// Checks a message length against `max_message_bytes`.
    pub fn check_message_bytes(&self, actual: usize) -> WireResult<()> {
        if actual > self.max_message_bytes {
            tracing::debug!(actual, limit = self.max_message_bytes, "message too large");
            return Err(DecodeError::LimitsExceeded {
                kind: LimitKind::MessageBytes,
                limit: self.max_message_bytes,
                actual,
            });
        }
        Ok(())
    }

    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_message_bytes: 4096,
            max_block_length: 256,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_message_bytes: usize::MAX,
            max_block_length: usize::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_message_bytes, 1024 * 1024);
        assert_eq!(limits.max_block_length, 4096);
    }

    #[test]
    fn testing_limits_smaller() {
        let test_limits = Limits::for_testing();
        let default_limits = Limits::default();

        assert!(test_limits.max_message_bytes < default_limits.max_message_bytes);
        assert!(test_limits.max_block_length < default_limits.max_block_length);
    }

    #[test]
    fn unlimited_limits() {
        let limits = Limits::unlimited();
        assert_eq!(limits.max_message_bytes, usize::MAX);
        assert_eq!(limits.max_block_length, usize::MAX);
    }

    #[test]
    fn message_bytes_check_is_inclusive() {
        let limits = Limits::for_testing();
        assert!(limits.check_message_bytes(4096).is_ok());
        assert_eq!(
            limits.check_message_bytes(4097),
            Err(DecodeError::LimitsExceeded {
                kind: LimitKind::MessageBytes,
                limit: 4096,
                actual: 4097,
            })
        );
    }

    #[test]
    fn limits_const_constructible() {
        const LIMITS: Limits = Limits::for_testing();
        assert_eq!(LIMITS.max_block_length, 256);
    }
}
