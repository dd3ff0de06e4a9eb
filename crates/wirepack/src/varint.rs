//! # Variable-length integers
//!
//! `uint_x` carries counts, lengths and numeric codes; `int_x` carries signed
//! element numbers. Both favour the one-byte form for small values.

/// Largest `uint_x` stored directly in the marker byte.
pub const UINT_X_INLINE_MAX: u8 = 252;
/// Marker for a u16 payload.
pub const UINT_X_U16: u8 = 0xFD;
/// Marker for a u32 payload.
pub const UINT_X_U32: u8 = 0xFE;
/// Marker for a u64 payload.
pub const UINT_X_U64: u8 = 0xFF;

/// Range of `int_x` values stored directly in the marker byte.
pub const INT_X_INLINE: std::ops::RangeInclusive<i64> = -124..=124;
/// Marker for an i16 payload.
pub const INT_X_I16: i8 = 125;
/// Marker for an i32 payload.
pub const INT_X_I32: i8 = 126;
/// Marker for an i64 payload.
pub const INT_X_I64: i8 = 127;

/// Encoded width of `v` as a `uint_x`.
pub const fn uint_x_len(v: u64) -> usize {
    if v <= UINT_X_INLINE_MAX as u64 {
        1
    } else if v <= u16::MAX as u64 {
        3
    } else if v <= u32::MAX as u64 {
        5
    } else {
        9
    }
}

/// Encoded width of `v` as an `int_x`.
pub const fn int_x_len(v: i64) -> usize {
    if v >= -124 && v <= 124 {
        1
    } else if v >= i16::MIN as i64 && v <= i16::MAX as i64 {
        3
    } else if v >= i32::MIN as i64 && v <= i32::MAX as i64 {
        5
    } else {
        9
    }
}

/// Encoded width of a string or blob of `len` bytes, prefix included.
pub const fn blob_len(len: usize) -> usize {
    uint_x_len(len as u64) + len
}
