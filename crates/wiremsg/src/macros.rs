//! Macros shared by the data model and the field plan.

/// Array-shaped element payloads.
/// Arguments passed to callback:
/// 1. `ElementData` variant, also the `DataType` variant
/// 2. Rust element type
/// 3. Accessor name
macro_rules! for_each_array {
    ($m:ident) => {
        $m! {
            (Double, f64, as_f64s),
            (Single, f32, as_f32s),
            (Int8, i8, as_i8s),
            (UInt8, u8, as_u8s),
            (Int16, i16, as_i16s),
            (UInt16, u16, as_u16s),
            (Int32, i32, as_i32s),
            (UInt32, u32, as_u32s),
            (Int64, i64, as_i64s),
            (UInt64, u64, as_u64s),
            (CDouble, crate::types::CDouble, as_cdoubles),
            (CSingle, crate::types::CSingle, as_csingles),
            (Bool, bool, as_bools),
        }
    };
}

/// Declares a flags byte as a newtype with named bits.
///
/// `reserved` lists the bits that must never appear on the wire; `validate`
/// rejects them as `Error::MalformedFlags`.
macro_rules! wire_flags {
    (
        $(#[$meta:meta])*
        $name:ident ($entity:literal) reserved $reserved:literal {
            $( $(#[$fmeta:meta])* const $flag:ident = $bit:literal; )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub struct $name(u8);

        impl $name {
            $( $(#[$fmeta])* pub const $flag: Self = Self($bit); )*

            /// Bits with no defined meaning.
            pub const RESERVED: u8 = $reserved;

            /// Every named flag, in wire order.
            pub const ALL: &'static [(&'static str, Self)] = &[ $( (stringify!($flag), Self::$flag), )* ];

            pub const fn empty() -> Self {
                Self(0)
            }

            pub const fn bits(self) -> u8 {
                self.0
            }

            /// Wraps a raw flags byte without checking it.
            pub const fn from_bits_retain(bits: u8) -> Self {
                Self(bits)
            }

            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            pub fn insert(&mut self, other: Self) {
                self.0 |= other.0;
            }

            pub fn remove(&mut self, other: Self) {
                self.0 &= !other.0;
            }

            pub fn set(&mut self, other: Self, on: bool) {
                if on {
                    self.insert(other)
                } else {
                    self.remove(other)
                }
            }

            /// Fails with `MalformedFlags` when a reserved bit is set.
            pub fn validate(self) -> crate::error::Result<Self> {
                if self.0 & Self::RESERVED != 0 {
                    return Err(crate::error::Error::MalformedFlags { entity: $entity, flags: self.0 });
                }
                Ok(self)
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;
            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl std::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}(", stringify!($name))?;
                let mut first = true;
                for (label, flag) in Self::ALL {
                    if self.contains(*flag) {
                        if !first {
                            f.write_str(" | ")?;
                        }
                        f.write_str(label)?;
                        first = false;
                    }
                }
                if self.0 & Self::RESERVED != 0 {
                    if !first {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{:#04x}", self.0 & Self::RESERVED)?;
                }
                f.write_str(")")
            }
        }
    };
}

pub(crate) use for_each_array;
pub(crate) use wire_flags;
