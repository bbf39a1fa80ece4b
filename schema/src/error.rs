//! Schema validation errors.

use std::fmt;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors that can occur when building or validating a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Duplicate template ID in a schema.
    DuplicateTemplateId { template_id: u16 },

    /// Duplicate field, group or var-data ID within one message.
    DuplicateId { template_id: u16, id: u16 },

    /// A message declares a different schema id than its schema.
    SchemaIdMismatch {
        template_id: u16,
        expected: u16,
        found: u16,
    },

    /// A message declares a different schema version than its schema.
    SchemaVersionMismatch {
        template_id: u16,
        expected: u16,
        found: u16,
    },

    /// A fixed field extends past its block.
    FieldOutsideBlock {
        field: &'static str,
        end: usize,
        block_length: u16,
    },

    /// Two fixed fields share bytes.
    OverlappingFields {
        first: &'static str,
        second: &'static str,
    },

    /// An element was introduced in a version newer than the schema.
    FutureSinceVersion {
        name: &'static str,
        since_version: u16,
        schema_version: u16,
    },

    /// A block length equals the reserved null sentinel.
    InvalidBlockLength { name: &'static str, block_length: u16 },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateTemplateId { template_id } => {
                write!(f, "duplicate template id {template_id}")
            }
            Self::DuplicateId { template_id, id } => {
                write!(f, "duplicate id {id} in template {template_id}")
            }
            Self::SchemaIdMismatch {
                template_id,
                expected,
                found,
            } => {
                write!(
                    f,
                    "template {template_id} declares schema id {found}, expected {expected}"
                )
            }
            Self::SchemaVersionMismatch {
                template_id,
                expected,
                found,
            } => {
                write!(
                    f,
                    "template {template_id} declares schema version {found}, expected {expected}"
                )
            }
            Self::FieldOutsideBlock {
                field,
                end,
                block_length,
            } => {
                write!(
                    f,
                    "field {field} ends at {end} beyond block length {block_length}"
                )
            }
            Self::OverlappingFields { first, second } => {
                write!(f, "fields {first} and {second} overlap")
            }
            Self::FutureSinceVersion {
                name,
                since_version,
                schema_version,
            } => {
                write!(
                    f,
                    "{name} introduced in version {since_version} but schema is version {schema_version}"
                )
            }
            Self::InvalidBlockLength { name, block_length } => {
                write!(f, "{name} has invalid block length {block_length}")
            }
        }
    }
}

impl std::error::Error for SchemaError {}
