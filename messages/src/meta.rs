//! Accessor generators for per-field constant metadata.

/// Expands to the constant accessors of a fixed field: id, introduction
/// version, offset, width and the null/min/max values of its type.
macro_rules! field_meta {
    ($def:expr => $ty:ty {
        id: $id:ident,
        since_version: $since:ident,
        offset: $offset:ident,
        length: $length:ident,
        null: $null:ident,
        min: $min:ident,
        max: $max:ident $(,)?
    }) => {
        #[must_use]
        pub const fn $id() -> u16 {
            $def.id
        }

        #[must_use]
        pub const fn $since() -> u16 {
            $def.since_version
        }

        #[must_use]
        pub const fn $offset() -> usize {
            $def.offset as usize
        }

        #[must_use]
        pub const fn $length() -> usize {
            <$ty as ::buffer::Primitive>::SIZE
        }

        #[must_use]
        pub const fn $null() -> $ty {
            <$ty as ::buffer::Primitive>::NULL
        }

        #[must_use]
        pub const fn $min() -> $ty {
            <$ty as ::buffer::Primitive>::MIN
        }

        #[must_use]
        pub const fn $max() -> $ty {
            <$ty as ::buffer::Primitive>::MAX
        }
    };
}

/// Expands to the constant accessors of a var-data field.
macro_rules! var_data_meta {
    ($def:expr => {
        id: $id:ident,
        since_version: $since:ident,
        header_length: $header:ident,
        character_encoding: $encoding:ident $(,)?
    }) => {
        #[must_use]
        pub const fn $id() -> u16 {
            $def.id
        }

        #[must_use]
        pub const fn $since() -> u16 {
            $def.since_version
        }

        /// Width of the length prefix in bytes.
        #[must_use]
        pub const fn $header() -> usize {
            $def.prefix.width()
        }

        #[must_use]
        pub const fn $encoding() -> ::schema::CharacterEncoding {
            $def.encoding
        }
    };
}

pub(crate) use field_meta;
pub(crate) use var_data_meta;
