//! Error types for codec operations.

use std::fmt;

use buffer::BufferError;
use wire::EncodeError;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding or decoding a message.
///
/// Every variant except the dispatch ones aborts the current pass: the
/// cursor is left where the failing call found it, but the record as a whole
/// is no longer consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Wire framing error from the outer header.
    Wire(wire::DecodeError),

    /// A var-data length exceeds what its prefix can carry.
    LengthOverflow { length: usize, max: usize },

    /// `next()` was called after the last group element.
    GroupExhausted { count: usize },

    /// A read needs bytes beyond the end of the buffer.
    Truncated { needed: usize, available: usize },

    /// A write needs bytes beyond the end of the output buffer.
    OutputTooSmall { needed: usize, available: usize },

    /// A group count outside `0..=65534`.
    GroupCountOutOfRange { count: usize, max: usize },

    /// An element block length outside `0..=65534`.
    BlockLengthOutOfRange { block_length: usize, max: usize },

    /// A fixed field would be written outside its block.
    FieldOutOfBlock {
        offset: usize,
        size: usize,
        block_length: usize,
    },

    /// A scalar value the field at `offset` cannot carry.
    InvalidValue { offset: usize, reason: ValueReason },

    /// A text var-data payload is not valid UTF-8.
    InvalidUtf8 { offset: usize },

    /// Decode limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// The header names a template the schema does not define.
    UnknownTemplate { template_id: u16 },

    /// The header belongs to a different schema.
    SchemaMismatch { expected: u16, found: u16 },

    /// A dynamic record does not match its descriptor.
    RecordMismatch { reason: RecordReason },
}

/// Specific decode limit that was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    GroupCount,
    VarDataLength,
    TotalElements,
}

/// Details for invalid value errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueReason {
    /// The value is the type's reserved null sentinel on a required field.
    NullOnRequired,
    /// The value is outside the type's `[min, max]`.
    OutOfRange,
    /// The value's type differs from the field's declared type.
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// Details for dynamic record mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordReason {
    FieldCount { expected: usize, actual: usize },
    GroupCount { expected: usize, actual: usize },
    VarDataCount { expected: usize, actual: usize },
    NotUtf8 { name: &'static str },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wire(e) => write!(f, "wire error: {e}"),
            Self::LengthOverflow { length, max } => {
                write!(f, "var-data length {length} exceeds maximum {max}")
            }
            Self::GroupExhausted { count } => {
                write!(f, "group exhausted after {count} elements")
            }
            Self::Truncated { needed, available } => {
                write!(f, "buffer truncated: need {needed}, have {available}")
            }
            Self::OutputTooSmall { needed, available } => {
                write!(f, "output too small: need {needed}, have {available}")
            }
            Self::GroupCountOutOfRange { count, max } => {
                write!(f, "group count {count} outside 0..={max}")
            }
            Self::BlockLengthOutOfRange { block_length, max } => {
                write!(f, "block length {block_length} outside 0..={max}")
            }
            Self::FieldOutOfBlock {
                offset,
                size,
                block_length,
            } => {
                write!(
                    f,
                    "field at {offset} (+{size}) outside block of {block_length} bytes"
                )
            }
            Self::InvalidValue { offset, reason } => {
                write!(f, "invalid value for field at offset {offset}: {reason}")
            }
            Self::InvalidUtf8 { offset } => {
                write!(f, "invalid utf-8 in var-data at offset {offset}")
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
            Self::UnknownTemplate { template_id } => {
                write!(f, "unknown template id {template_id}")
            }
            Self::SchemaMismatch { expected, found } => {
                write!(f, "schema id mismatch: expected {expected}, found {found}")
            }
            Self::RecordMismatch { reason } => write!(f, "record mismatch: {reason}"),
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::GroupCount => "group count",
            Self::VarDataLength => "var-data length",
            Self::TotalElements => "total elements",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for ValueReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullOnRequired => write!(f, "null sentinel on a required field"),
            Self::OutOfRange => write!(f, "value outside the type's valid range"),
            Self::TypeMismatch { expected, found } => {
                write!(f, "expected {expected} but got {found}")
            }
        }
    }
}

impl fmt::Display for RecordReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldCount { expected, actual } => {
                write!(f, "expected {expected} fields, got {actual}")
            }
            Self::GroupCount { expected, actual } => {
                write!(f, "expected {expected} groups, got {actual}")
            }
            Self::VarDataCount { expected, actual } => {
                write!(f, "expected {expected} var-data fields, got {actual}")
            }
            Self::NotUtf8 { name } => write!(f, "text field {name} holds non-utf-8 bytes"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Wire(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wire::DecodeError> for CodecError {
    fn from(err: wire::DecodeError) -> Self {
        match err {
            wire::DecodeError::Buffer(buf) => buf.into(),
            other => Self::Wire(other),
        }
    }
}

impl From<BufferError> for CodecError {
    fn from(err: BufferError) -> Self {
        let needed = err.needed();
        match err {
            BufferError::UnexpectedEof { available, .. } => Self::Truncated { needed, available },
            BufferError::CapacityExceeded { capacity, .. } => Self::OutputTooSmall {
                needed,
                available: capacity,
            },
        }
    }
}

impl From<EncodeError> for CodecError {
    fn from(err: EncodeError) -> Self {
        match err {
            EncodeError::Buffer(buf) => buf.into(),
            EncodeError::LengthOverflow { length, max } => Self::LengthOverflow { length, max },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_length_overflow() {
        let err = CodecError::LengthOverflow {
            length: 65535,
            max: 65534,
        };
        let msg = err.to_string();
        assert!(msg.contains("65535"), "should mention length");
        assert!(msg.contains("65534"), "should mention max");
    }

    #[test]
    fn error_display_group_exhausted() {
        let err = CodecError::GroupExhausted { count: 2 };
        assert!(err.to_string().contains("exhausted"));
    }

    #[test]
    fn error_display_invalid_value() {
        let err = CodecError::InvalidValue {
            offset: 8,
            reason: ValueReason::NullOnRequired,
        };
        let msg = err.to_string();
        assert!(msg.contains("offset 8"));
        assert!(msg.contains("null"));
    }

    #[test]
    fn buffer_eof_becomes_truncated() {
        let err: CodecError = BufferError::UnexpectedEof {
            offset: 6,
            requested: 4,
            available: 8,
        }
        .into();
        assert_eq!(
            err,
            CodecError::Truncated {
                needed: 10,
                available: 8
            }
        );
    }

    #[test]
    fn buffer_capacity_becomes_output_too_small() {
        let err: CodecError = BufferError::CapacityExceeded {
            offset: 2,
            requested: 4,
            capacity: 3,
        }
        .into();
        assert_eq!(
            err,
            CodecError::OutputTooSmall {
                needed: 6,
                available: 3
            }
        );
    }

    #[test]
    fn wire_buffer_errors_are_flattened() {
        let err: CodecError = wire::DecodeError::Buffer(BufferError::UnexpectedEof {
            offset: 0,
            requested: 8,
            available: 3,
        })
        .into();
        assert!(matches!(err, CodecError::Truncated { .. }));

        let err: CodecError = wire::DecodeError::NullHeaderField {
            field: "template_id",
        }
        .into();
        assert!(matches!(err, CodecError::Wire(_)));
    }

    #[test]
    fn encode_overflow_maps_through() {
        let err: CodecError = EncodeError::LengthOverflow { length: 9, max: 8 }.into();
        assert_eq!(err, CodecError::LengthOverflow { length: 9, max: 8 });
    }

    #[test]
    fn error_source_wire() {
        let err = CodecError::Wire(wire::DecodeError::NullHeaderField { field: "x" });
        assert!(std::error::Error::source(&err).is_some());
        let err = CodecError::GroupExhausted { count: 0 };
        assert!(std::error::Error::source(&err).is_none());
    }
}
