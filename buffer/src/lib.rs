//! Bounds-checked little-endian byte access for the blockwire codec.
//!
//! This crate provides [`ReadBuf`] and [`WriteBuf`], thin views over
//! caller-owned byte slices, and the [`Primitive`] trait describing the fixed
//! scalar types the wire format supports.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads/writes are bounds-checked.
//! - **No ownership** - Views borrow; they never allocate or retain buffers.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use buffer::{ReadBuf, WriteBuf};
//!
//! let mut bytes = [0u8; 10];
//! let mut writer = WriteBuf::new(&mut bytes);
//! writer.put(0, 42u64).unwrap();
//! writer.put(8, 7u16).unwrap();
//!
//! let reader = ReadBuf::new(&bytes);
//! assert_eq!(reader.get::<u64>(0).unwrap(), 42);
//! assert_eq!(reader.get::<u16>(8).unwrap(), 7);
//! ```

mod error;
mod primitive;
mod reader;
mod writer;

pub use error::{BufferError, BufferResult};
pub use primitive::Primitive;
pub use reader::ReadBuf;
pub use writer::WriteBuf;
