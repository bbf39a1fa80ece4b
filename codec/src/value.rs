//! Owned, descriptor-shaped message values.

use schema::ScalarValue;

/// A decoded record laid out in descriptor order.
///
/// `fields[i]` belongs to `BlockDef::fields[i]`, `groups[i]` holds the
/// elements of `BlockDef::groups[i]`, and `var_data[i]` the payload of
/// `BlockDef::var_data[i]`. Groups and var-data a sender's version predates
/// decode as empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    pub fields: Vec<ScalarValue>,
    pub groups: Vec<Vec<Record>>,
    pub var_data: Vec<Vec<u8>>,
}

impl Record {
    /// Creates a record from its parts.
    #[must_use]
    pub fn new(fields: Vec<ScalarValue>, groups: Vec<Vec<Self>>, var_data: Vec<Vec<u8>>) -> Self {
        Self {
            fields,
            groups,
            var_data,
        }
    }

    /// Creates a record with only fixed fields.
    #[must_use]
    pub fn with_fields(fields: Vec<ScalarValue>) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }
}
