//! Message descriptors for the blockwire codec.
//!
//! A descriptor is the constant table a schema compiler emits for each
//! message template:
//! - Template id, schema id and schema version
//! - The fixed block length and the offset and type of every scalar field
//! - Repeating groups and trailing var-data fields, in schema order
//!
//! Descriptors are built from `&'static` tables so they can live in `const`
//! items, and [`Schema`] groups them under one schema id for dispatch.
//!
//! # Design Principles
//!
//! - **Data, not code** - Generated messages are constant tables; the codec runtime does the work.
//! - **Validated once** - Layout invariants are checked when a schema is built.
//! - **Deterministic hashing** - Schema hash is stable given the same layout.

mod error;
mod field;
mod hash;
mod schema;

pub use error::{SchemaError, SchemaResult};
pub use field::{CharacterEncoding, FieldDef, Presence, PrimitiveType, ScalarValue, VarDataDef};
pub use hash::schema_hash;
pub use schema::{BlockDef, GroupDef, MessageDescriptor, Schema, SchemaBuilder};
