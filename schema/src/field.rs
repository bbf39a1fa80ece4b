//! Scalar types, values and fixed field definitions.

use std::fmt;

use buffer::{BufferResult, Primitive, ReadBuf, WriteBuf};
use wire::LengthPrefix;

macro_rules! primitive_table {
    ($($variant:ident => $t:ty, $name:literal;)*) => {
        /// The scalar types a fixed field may carry.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize))]
        pub enum PrimitiveType {
            $($variant,)*
        }

        /// A decoded scalar, tagged with its type.
        #[derive(Debug, Clone, Copy, PartialEq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize))]
        pub enum ScalarValue {
            $($variant($t),)*
        }

        impl PrimitiveType {
            /// Encoded width in bytes.
            #[must_use]
            pub const fn size(self) -> usize {
                match self {
                    $(Self::$variant => <$t as Primitive>::SIZE,)*
                }
            }

            /// Schema name of the type.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// Reserved null sentinel of the type.
            #[must_use]
            pub fn null_value(self) -> ScalarValue {
                match self {
                    $(Self::$variant => ScalarValue::$variant(<$t as Primitive>::NULL),)*
                }
            }

            /// Smallest valid value of the type.
            #[must_use]
            pub fn min_value(self) -> ScalarValue {
                match self {
                    $(Self::$variant => ScalarValue::$variant(<$t as Primitive>::MIN),)*
                }
            }

            /// Largest valid value of the type.
            #[must_use]
            pub fn max_value(self) -> ScalarValue {
                match self {
                    $(Self::$variant => ScalarValue::$variant(<$t as Primitive>::MAX),)*
                }
            }

            /// Reads a value of this type at `offset`.
            pub fn read(self, buf: &ReadBuf<'_>, offset: usize) -> BufferResult<ScalarValue> {
                Ok(match self {
                    $(Self::$variant => ScalarValue::$variant(buf.get::<$t>(offset)?),)*
                })
            }
        }

        impl ScalarValue {
            /// Returns the type tag of this value.
            #[must_use]
            pub const fn primitive_type(&self) -> PrimitiveType {
                match self {
                    $(Self::$variant(_) => PrimitiveType::$variant,)*
                }
            }

            /// Returns `true` if this value is its type's null sentinel.
            #[must_use]
            pub fn is_null(&self) -> bool {
                match self {
                    $(Self::$variant(v) => v.is_null(),)*
                }
            }

            /// Returns `true` if this value is within its type's valid range.
            #[must_use]
            pub fn in_range(&self) -> bool {
                match self {
                    $(Self::$variant(v) => v.in_range(),)*
                }
            }

            /// Writes the value at `offset`.
            pub fn write(&self, buf: &mut WriteBuf<'_>, offset: usize) -> BufferResult<()> {
                match self {
                    $(Self::$variant(v) => buf.put(offset, *v),)*
                }
            }
        }

        impl fmt::Display for ScalarValue {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Self::$variant(v) => write!(f, "{v}"),)*
                }
            }
        }

        $(
            impl From<$t> for ScalarValue {
                fn from(value: $t) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

primitive_table! {
    Int8 => i8, "int8";
    Int16 => i16, "int16";
    Int32 => i32, "int32";
    Int64 => i64, "int64";
    UInt8 => u8, "uint8";
    UInt16 => u16, "uint16";
    UInt32 => u32, "uint32";
    UInt64 => u64, "uint64";
    Float => f32, "float";
    Double => f64, "double";
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a field must always carry a valid value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Presence {
    /// Writers must supply a value in `[min, max]`.
    #[default]
    Required,
    /// Writers may supply the null sentinel to mark the field absent.
    Optional,
}

/// A fixed-offset scalar field within a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldDef {
    pub name: &'static str,
    pub id: u16,
    /// Offset from the start of the owning block.
    pub offset: u16,
    pub primitive: PrimitiveType,
    /// Schema version that introduced the field.
    pub since_version: u16,
    pub presence: Presence,
}

impl FieldDef {
    /// Creates a required field present since version 0.
    #[must_use]
    pub const fn new(name: &'static str, id: u16, offset: u16, primitive: PrimitiveType) -> Self {
        Self {
            name,
            id,
            offset,
            primitive,
            since_version: 0,
            presence: Presence::Required,
        }
    }

    /// Marks the field as introduced in `version`.
    #[must_use]
    pub const fn since(mut self, version: u16) -> Self {
        self.since_version = version;
        self
    }

    /// Marks the field as optional.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.presence = Presence::Optional;
        self
    }

    /// Offset one past the field's last byte.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset as usize + self.primitive.size()
    }
}

/// How var-data payload bytes are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CharacterEncoding {
    /// UTF-8 text.
    #[default]
    Utf8,
    /// Opaque bytes.
    Raw,
}

/// A length-prefixed variable-size field trailing a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VarDataDef {
    pub name: &'static str,
    pub id: u16,
    pub since_version: u16,
    pub prefix: LengthPrefix,
    pub encoding: CharacterEncoding,
}

impl VarDataDef {
    /// Creates a UTF-8 var-data field present since version 0.
    #[must_use]
    pub const fn new(name: &'static str, id: u16, prefix: LengthPrefix) -> Self {
        Self {
            name,
            id,
            since_version: 0,
            prefix,
            encoding: CharacterEncoding::Utf8,
        }
    }

    /// Marks the field as introduced in `version`.
    #[must_use]
    pub const fn since(mut self, version: u16) -> Self {
        self.since_version = version;
        self
    }

    /// Marks the payload as opaque bytes.
    #[must_use]
    pub const fn raw(mut self) -> Self {
        self.encoding = CharacterEncoding::Raw;
        self
    }
}
