//! Message descriptors and schema validation.

use std::collections::HashSet;

use wire::{MessageHeader, MAX_GROUP_BLOCK_LENGTH};

use crate::error::{SchemaError, SchemaResult};
use crate::field::{FieldDef, VarDataDef};

/// The layout of one record: a fixed block followed by groups, then var-data.
///
/// Shared by message bodies and group elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BlockDef {
    pub block_length: u16,
    pub fields: &'static [FieldDef],
    pub groups: &'static [GroupDef],
    pub var_data: &'static [VarDataDef],
}

impl BlockDef {
    /// Creates an empty block of `block_length` bytes.
    #[must_use]
    pub const fn new(block_length: u16) -> Self {
        Self {
            block_length,
            fields: &[],
            groups: &[],
            var_data: &[],
        }
    }

    #[must_use]
    pub const fn with_fields(mut self, fields: &'static [FieldDef]) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub const fn with_groups(mut self, groups: &'static [GroupDef]) -> Self {
        self.groups = groups;
        self
    }

    #[must_use]
    pub const fn with_var_data(mut self, var_data: &'static [VarDataDef]) -> Self {
        self.var_data = var_data;
        self
    }

    /// Looks up a fixed field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Looks up a group by name.
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&'static GroupDef> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Looks up a var-data field by name.
    #[must_use]
    pub fn var_data_def(&self, name: &str) -> Option<&'static VarDataDef> {
        self.var_data.iter().find(|d| d.name == name)
    }

    fn validate(
        &self,
        template_id: u16,
        schema_version: u16,
        ids: &mut HashSet<u16>,
    ) -> SchemaResult<()> {
        for (i, field) in self.fields.iter().enumerate() {
            check_id(ids, template_id, field.id)?;
            check_since(field.name, field.since_version, schema_version)?;
            if field.end() > usize::from(self.block_length) {
                return Err(SchemaError::FieldOutsideBlock {
                    field: field.name,
                    end: field.end(),
                    block_length: self.block_length,
                });
            }
            for other in &self.fields[..i] {
                if usize::from(field.offset) < other.end() && usize::from(other.offset) < field.end() {
                    return Err(SchemaError::OverlappingFields {
                        first: other.name,
                        second: field.name,
                    });
                }
            }
        }

        for group in self.groups {
            check_id(ids, template_id, group.id)?;
            check_since(group.name, group.since_version, schema_version)?;
            if usize::from(group.body.block_length) > MAX_GROUP_BLOCK_LENGTH {
                return Err(SchemaError::InvalidBlockLength {
                    name: group.name,
                    block_length: group.body.block_length,
                });
            }
            group.body.validate(template_id, schema_version, ids)?;
        }

        for def in self.var_data {
            check_id(ids, template_id, def.id)?;
            check_since(def.name, def.since_version, schema_version)?;
        }

        Ok(())
    }
}

/// A repeating group nested in a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GroupDef {
    pub name: &'static str,
    pub id: u16,
    pub since_version: u16,
    /// Layout of each element.
    pub body: BlockDef,
}

impl GroupDef {
    /// Creates a group present since version 0.
    #[must_use]
    pub const fn new(name: &'static str, id: u16, body: BlockDef) -> Self {
        Self {
            name,
            id,
            since_version: 0,
            body,
        }
    }

    /// Marks the group as introduced in `version`.
    #[must_use]
    pub const fn since(mut self, version: u16) -> Self {
        self.since_version = version;
        self
    }
}

/// The constant table describing one message template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MessageDescriptor {
    pub name: &'static str,
    pub template_id: u16,
    pub schema_id: u16,
    pub schema_version: u16,
    pub body: BlockDef,
}

impl MessageDescriptor {
    /// Fixed block length of the current schema version.
    #[must_use]
    pub const fn block_length(&self) -> u16 {
        self.body.block_length
    }

    /// The header an encoder writes for this template.
    #[must_use]
    pub const fn header(&self) -> MessageHeader {
        MessageHeader::new(
            self.body.block_length,
            self.template_id,
            self.schema_id,
            self.schema_version,
        )
    }

    /// Checks layout invariants: fields inside the block and disjoint, ids
    /// unique, no element newer than the descriptor's schema version.
    pub fn validate(&self) -> SchemaResult<()> {
        if self.body.block_length == u16::MAX {
            return Err(SchemaError::InvalidBlockLength {
                name: self.name,
                block_length: self.body.block_length,
            });
        }
        let mut ids = HashSet::new();
        self.body
            .validate(self.template_id, self.schema_version, &mut ids)
    }
}

/// A set of message templates sharing one schema id and version.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Schema {
    pub id: u16,
    pub version: u16,
    pub messages: Vec<MessageDescriptor>,
}

impl Schema {
    /// Creates a schema after validation.
    pub fn new(id: u16, version: u16, messages: Vec<MessageDescriptor>) -> SchemaResult<Self> {
        let schema = Self {
            id,
            version,
            messages,
        };
        schema.validate()?;
        Ok(schema)
    }

    /// Creates a schema builder.
    #[must_use]
    pub fn builder(id: u16, version: u16) -> SchemaBuilder {
        SchemaBuilder {
            id,
            version,
            messages: Vec::new(),
        }
    }

    /// Finds the descriptor for `template_id`.
    #[must_use]
    pub fn find(&self, template_id: u16) -> Option<&MessageDescriptor> {
        self.messages.iter().find(|m| m.template_id == template_id)
    }

    /// Validates schema invariants.
    pub fn validate(&self) -> SchemaResult<()> {
        let mut template_ids = HashSet::new();
        for message in &self.messages {
            if !template_ids.insert(message.template_id) {
                return Err(SchemaError::DuplicateTemplateId {
                    template_id: message.template_id,
                });
            }
            if message.schema_id != self.id {
                return Err(SchemaError::SchemaIdMismatch {
                    template_id: message.template_id,
                    expected: self.id,
                    found: message.schema_id,
                });
            }
            if message.schema_version != self.version {
                return Err(SchemaError::SchemaVersionMismatch {
                    template_id: message.template_id,
                    expected: self.version,
                    found: message.schema_version,
                });
            }
            message.validate()?;
        }
        Ok(())
    }
}

/// Builder for `Schema`.
#[derive(Debug)]
pub struct SchemaBuilder {
    id: u16,
    version: u16,
    messages: Vec<MessageDescriptor>,
}

impl SchemaBuilder {
    /// Adds a message descriptor.
    #[must_use]
    pub fn message(mut self, message: MessageDescriptor) -> Self {
        self.messages.push(message);
        self
    }

    /// Builds the schema after validation.
    pub fn build(self) -> SchemaResult<Schema> {
        Schema::new(self.id, self.version, self.messages)
    }
}

fn check_id(ids: &mut HashSet<u16>, template_id: u16, id: u16) -> SchemaResult<()> {
    if ids.insert(id) {
        Ok(())
    } else {
        Err(SchemaError::DuplicateId { template_id, id })
    }
}

fn check_since(name: &'static str, since_version: u16, schema_version: u16) -> SchemaResult<()> {
    if since_version > schema_version {
        return Err(SchemaError::FutureSinceVersion {
            name,
            since_version,
            schema_version,
        });
    }
    Ok(())
}
