//! # Wirepack
//!
//! The primitive byte layer underneath `wiremsg`.
//!
//! ## Format
//!
//! - **Fixed width**: `u8..u64`, `i8..i64`, `f32`, `f64` little-endian; `bool` is one byte.
//! - **uint_x**: `<= 252` in one byte, else a marker byte (`0xFD`, `0xFE`, `0xFF`)
//!   followed by a u16, u32 or u64.
//! - **int_x**: `-124..=124` in one byte, else a marker byte (`125`, `126`, `127`)
//!   followed by an i16, i32 or i64.
//! - **Strings / Blobs**: `[uint_x len][bytes]`.
//! - **Sized scopes**: `[u32 size][body]`, back-patched when the scope closes.
//!
//! Writing goes through the [`Sink`] trait so one traversal can either count bytes
//! ([`SizeCounter`]) or write them into a caller-owned slice ([`SliceWriter`]).
//! Reading goes through [`Cursor`]. Varints are always written in their shortest
//! form and only accepted in their shortest form, so a decoded value re-encodes to
//! exactly the bytes it was read from.

mod macros;

pub mod cursor;
pub mod error;
pub mod primitive;
pub mod sink;
pub mod varint;

pub use cursor::Cursor;
pub use error::Error;
pub use error::Result;
pub use primitive::Primitive;
pub use sink::Scope;
pub use sink::SizeCounter;
pub use sink::Sink;
pub use sink::SliceWriter;
