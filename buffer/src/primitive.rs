//! Fixed-width scalar types and their reserved sentinels.

use std::fmt;
use std::mem::size_of;

/// A fixed-width scalar stored little-endian.
///
/// Every type reserves one value as its null sentinel. The sentinel sits
/// outside `[MIN, MAX]` so that required fields never collide with it:
///
/// | kind     | `NULL`       | `MIN`          | `MAX`          |
/// |----------|--------------|----------------|----------------|
/// | unsigned | type max     | 0              | type max - 1   |
/// | signed   | type min     | type min + 1   | type max       |
/// | float    | NaN          | type min       | type max       |
pub trait Primitive: Copy + PartialEq + PartialOrd + fmt::Debug + fmt::Display {
    /// Encoded width in bytes.
    const SIZE: usize;
    /// Reserved null sentinel.
    const NULL: Self;
    /// Smallest valid value.
    const MIN: Self;
    /// Largest valid value.
    const MAX: Self;

    /// Decodes from the first `SIZE` bytes of `bytes`.
    ///
    /// Callers must have checked that `bytes.len() >= SIZE`.
    fn read_le(bytes: &[u8]) -> Self;

    /// Encodes into the first `SIZE` bytes of `out`.
    ///
    /// Callers must have checked that `out.len() >= SIZE`.
    fn write_le(self, out: &mut [u8]);

    /// Returns `true` if this value is the null sentinel.
    fn is_null(self) -> bool {
        self == Self::NULL
    }

    /// Returns `true` if this value lies within `[MIN, MAX]`.
    fn in_range(self) -> bool {
        self >= Self::MIN && self <= Self::MAX
    }
}

macro_rules! impl_unsigned {
    ($($t:ty),*) => {$(
        impl Primitive for $t {
            const SIZE: usize = size_of::<$t>();
            const NULL: Self = <$t>::MAX;
            const MIN: Self = 0;
            const MAX: Self = <$t>::MAX - 1;

            #[inline]
            fn read_le(bytes: &[u8]) -> Self {
                let mut raw = [0u8; size_of::<$t>()];
                raw.copy_from_slice(&bytes[..size_of::<$t>()]);
                <$t>::from_le_bytes(raw)
            }

            #[inline]
            fn write_le(self, out: &mut [u8]) {
                out[..size_of::<$t>()].copy_from_slice(&self.to_le_bytes());
            }
        }
    )*};
}

macro_rules! impl_signed {
    ($($t:ty),*) => {$(
        impl Primitive for $t {
            const SIZE: usize = size_of::<$t>();
            const NULL: Self = <$t>::MIN;
            const MIN: Self = <$t>::MIN + 1;
            const MAX: Self = <$t>::MAX;

            #[inline]
            fn read_le(bytes: &[u8]) -> Self {
                let mut raw = [0u8; size_of::<$t>()];
                raw.copy_from_slice(&bytes[..size_of::<$t>()]);
                <$t>::from_le_bytes(raw)
            }

            #[inline]
            fn write_le(self, out: &mut [u8]) {
                out[..size_of::<$t>()].copy_from_slice(&self.to_le_bytes());
            }
        }
    )*};
}

macro_rules! impl_float {
    ($($t:ty),*) => {$(
        impl Primitive for $t {
            const SIZE: usize = size_of::<$t>();
            const NULL: Self = <$t>::NAN;
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;

            #[inline]
            fn read_le(bytes: &[u8]) -> Self {
                let mut raw = [0u8; size_of::<$t>()];
                raw.copy_from_slice(&bytes[..size_of::<$t>()]);
                <$t>::from_le_bytes(raw)
            }

            #[inline]
            fn write_le(self, out: &mut [u8]) {
                out[..size_of::<$t>()].copy_from_slice(&self.to_le_bytes());
            }

            fn is_null(self) -> bool {
                self.is_nan()
            }
        }
    )*};
}

impl_unsigned!(u8, u16, u32, u64);
impl_signed!(i8, i16, i32, i64);
impl_float!(f32, f64);
