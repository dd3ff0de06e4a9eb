//! Macros for the fixed-width primitives.

/// Multibyte primitives that have `to_le_bytes()` / `from_le_bytes()`.
/// Arguments passed to callback:
/// 1. Rust Type
/// 2. Width in bytes
macro_rules! for_each_multibyte {
    ($m:ident) => {
        $m!(u16, 2);
        $m!(i16, 2);
        $m!(u32, 4);
        $m!(i32, 4);
        $m!(u64, 8);
        $m!(i64, 8);
        $m!(f32, 4);
        $m!(f64, 8);
    };
}

/// Implements `Primitive` for a multibyte little-endian type.
macro_rules! impl_primitive_le {
    ($ty:ty, $n:expr) => {
        impl crate::primitive::Primitive for $ty {
            const SIZE: usize = $n;

            #[inline(always)]
            fn write_le(self, dst: &mut [u8]) {
                dst[..$n].copy_from_slice(&self.to_le_bytes());
            }

            #[inline(always)]
            fn read_le(src: &[u8]) -> Self {
                let mut raw = [0u8; $n];
                raw.copy_from_slice(&src[..$n]);
                <$ty>::from_le_bytes(raw)
            }
        }
    };
}

pub(crate) use for_each_multibyte;
pub(crate) use impl_primitive_le;
