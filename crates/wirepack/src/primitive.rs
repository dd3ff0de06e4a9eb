//! Fixed-width values that can be copied to and from the wire.

use crate::macros::for_each_multibyte;
use crate::macros::impl_primitive_le;

/// A value with a fixed little-endian wire representation.
///
/// Callers guarantee that `dst`/`src` hold at least `SIZE` bytes; `Cursor` and
/// `SliceWriter` check bounds before handing out a chunk.
pub trait Primitive: Sized + Copy {
    const SIZE: usize;
    fn write_le(self, dst: &mut [u8]);
    fn read_le(src: &[u8]) -> Self;
}

impl Primitive for u8 {
    const SIZE: usize = 1;

    #[inline(always)]
    fn write_le(self, dst: &mut [u8]) {
        dst[0] = self;
    }

    #[inline(always)]
    fn read_le(src: &[u8]) -> Self {
        src[0]
    }
}

impl Primitive for i8 {
    const SIZE: usize = 1;

    #[inline(always)]
    fn write_le(self, dst: &mut [u8]) {
        dst[0] = self as u8;
    }

    #[inline(always)]
    fn read_le(src: &[u8]) -> Self {
        src[0] as i8
    }
}

// Any non-zero byte reads as true; writers only ever produce 0 or 1.
impl Primitive for bool {
    const SIZE: usize = 1;

    #[inline(always)]
    fn write_le(self, dst: &mut [u8]) {
        dst[0] = self as u8;
    }

    #[inline(always)]
    fn read_le(src: &[u8]) -> Self {
        src[0] != 0
    }
}

for_each_multibyte!(impl_primitive_le);
