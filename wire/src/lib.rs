//! Message header, group dimension and var-data framing for the blockwire codec.
//!
//! This crate handles the fixed structures of the wire format: the outer
//! message header, the 4-byte repeating-group dimension header, and the
//! length prefixes of variable-length fields. It does not know about message
//! shapes, only about the framing every message shares.
//!
//! # Layout
//!
//! ```text
//! [header 8][fixed block][group sections...][var-data sections...]
//!
//! group section = [block_length u16][num_in_group u16][elements...]
//! element       = [fixed element block][element groups...][element var-data...]
//! var-data      = [length u16|u32][payload]
//! ```
//!
//! # Design Principles
//!
//! - **Stable wire format** - Little-endian throughout; sentinels are reserved.
//! - **Bounded decoding** - Header lengths are validated against limits.
//! - **No domain knowledge** - This crate handles framing, not message contents.

mod error;
mod group;
mod header;
mod limits;
mod var_data;

pub use error::{DecodeError, EncodeError, LimitKind, WireResult};
pub use group::{GroupDimension, GROUP_HEADER_SIZE, MAX_GROUP_BLOCK_LENGTH, MAX_GROUP_COUNT};
pub use header::{decode_header, encode_header, MessageHeader, HEADER_SIZE};
pub use limits::Limits;
pub use var_data::LengthPrefix;

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn public_api_exports() {
        // Verify all expected items are exported
        let _ = HEADER_SIZE;
        let _ = GROUP_HEADER_SIZE;
        let _ = MessageHeader::new(0, 1, 1, 0);
        let _ = GroupDimension::default();
        let _ = LengthPrefix::U16;
        let _ = Limits::default();

        // Error types
        let _: WireResult<()> = Ok(());
    }

    #[test]
    fn header_size_constant_correct() {
        assert_eq!(
            HEADER_SIZE,
            size_of::<u16>() // block_length
                + size_of::<u16>() // template_id
                + size_of::<u16>() // schema_id
                + size_of::<u16>() // version
        );
    }

    #[test]
    fn group_header_size_constant_correct() {
        assert_eq!(GROUP_HEADER_SIZE, 2 * size_of::<u16>());
    }

    #[test]
    fn limits_default_is_reasonable() {
        let limits = Limits::default();
        assert!(limits.max_message_bytes >= 64 * 1024);
        assert!(limits.max_block_length >= 256);
    }
}
