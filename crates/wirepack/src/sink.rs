//! # Sinks
//!
//! A [`Sink`] receives the byte stream of one traversal. [`SizeCounter`] only counts,
//! [`SliceWriter`] writes into a caller-owned slice of exactly the counted length.
//! Driving both with the same traversal keeps the size pass and the write pass from
//! drifting apart.
//!
//! ## Sized scopes
//!
//! `begin_sized` reserves a u32 slot; `end_sized` back-patches it with the number of
//! bytes between the scope origin and the current position. Scopes nest and must be
//! closed in LIFO order.

use crate::error::Error;
use crate::error::Result;
use crate::primitive::Primitive;
use crate::varint;

/// Handle to an open sized scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    /// Position the size is measured from.
    origin: usize,
    /// Position of the reserved u32 slot.
    slot: usize,
}

/// The destination of a serialization traversal.
pub trait Sink {
    /// Bytes produced so far.
    fn position(&self) -> usize;

    /// Appends raw bytes.
    fn put_bytes(&mut self, v: &[u8]) -> Result<()>;

    /// Appends one fixed-width value.
    fn put<T: Primitive>(&mut self, v: T) -> Result<()>;

    /// Appends a homogeneous array of fixed-width values, without a count prefix.
    fn put_slice<T: Primitive>(&mut self, v: &[T]) -> Result<()>;

    /// Opens a sized scope measured from `origin`, which must not lie after the slot.
    fn begin_sized_from(&mut self, origin: usize) -> Result<Scope>;

    /// Closes `scope`, patching its slot. Returns the patched size.
    fn end_sized(&mut self, scope: Scope) -> Result<u32>;

    /// Opens a sized scope whose size includes its own four bytes.
    fn begin_sized(&mut self) -> Result<Scope> {
        let origin = self.position();
        self.begin_sized_from(origin)
    }

    /// Appends `v` as a `uint_x`.
    fn put_uint_x(&mut self, v: u64) -> Result<()> {
        if v <= varint::UINT_X_INLINE_MAX as u64 {
            self.put(v as u8)
        } else if v <= u16::MAX as u64 {
            self.put(varint::UINT_X_U16)?;
            self.put(v as u16)
        } else if v <= u32::MAX as u64 {
            self.put(varint::UINT_X_U32)?;
            self.put(v as u32)
        } else {
            self.put(varint::UINT_X_U64)?;
            self.put(v)
        }
    }

    /// Appends `v` as an `int_x`.
    fn put_int_x(&mut self, v: i64) -> Result<()> {
        if varint::INT_X_INLINE.contains(&v) {
            self.put(v as i8)
        } else if let Ok(v) = i16::try_from(v) {
            self.put(varint::INT_X_I16)?;
            self.put(v)
        } else if let Ok(v) = i32::try_from(v) {
            self.put(varint::INT_X_I32)?;
            self.put(v)
        } else {
            self.put(varint::INT_X_I64)?;
            self.put(v)
        }
    }

    /// Appends a length-prefixed UTF-8 string.
    fn put_str(&mut self, v: &str) -> Result<()> {
        self.put_blob(v.as_bytes())
    }

    /// Appends a length-prefixed byte blob.
    fn put_blob(&mut self, v: &[u8]) -> Result<()> {
        self.put_uint_x(v.len() as u64)?;
        self.put_bytes(v)
    }
}

fn array_len<T: Primitive>(count: usize) -> Result<usize> {
    count
        .checked_mul(T::SIZE)
        .ok_or(Error::TooLarge(count as u64))
}

/// Counts the bytes a traversal would produce.
#[derive(Debug, Default)]
pub struct SizeCounter {
    len: u64,
    open: usize,
}

impl SizeCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total, which must fit the u32 size fields of the format.
    ///
    /// # Errors
    /// `UnclosedScope` if a scope is still open, `TooLarge` past `u32::MAX`.
    pub fn finish(self) -> Result<u32> {
        if self.open != 0 {
            return Err(Error::UnclosedScope);
        }
        u32::try_from(self.len).map_err(|_| Error::TooLarge(self.len))
    }
}

impl Sink for SizeCounter {
    fn position(&self) -> usize {
        self.len as usize
    }

    #[inline]
    fn put_bytes(&mut self, v: &[u8]) -> Result<()> {
        self.len += v.len() as u64;
        Ok(())
    }

    #[inline]
    fn put<T: Primitive>(&mut self, _v: T) -> Result<()> {
        self.len += T::SIZE as u64;
        Ok(())
    }

    #[inline]
    fn put_slice<T: Primitive>(&mut self, v: &[T]) -> Result<()> {
        self.len += array_len::<T>(v.len())? as u64;
        Ok(())
    }

    fn begin_sized_from(&mut self, origin: usize) -> Result<Scope> {
        let slot = self.position();
        if origin > slot {
            return Err(Error::UnclosedScope);
        }
        self.len += 4;
        self.open += 1;
        Ok(Scope { origin, slot })
    }

    fn end_sized(&mut self, scope: Scope) -> Result<u32> {
        if self.open == 0 {
            return Err(Error::UnclosedScope);
        }
        self.open -= 1;
        let size = self.len - scope.origin as u64;
        u32::try_from(size).map_err(|_| Error::TooLarge(size))
    }
}

/// Writes into a fixed-size, caller-owned slice.
///
/// The slice is expected to be exactly as long as a `SizeCounter` pass reported;
/// running past it is an `Overflow`, stopping short is caught by the caller
/// comparing `finish()` against the slice length.
#[derive(Debug)]
pub struct SliceWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
    /// Slots of the open scopes, innermost last.
    stack: Vec<usize>,
}

impl<'a> SliceWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            stack: Vec::with_capacity(8),
        }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Consumes the writer and returns the number of bytes written.
    ///
    /// # Errors
    /// Returns `Error::UnclosedScope` if a sized scope is still open.
    pub fn finish(self) -> Result<usize> {
        if !self.stack.is_empty() {
            return Err(Error::UnclosedScope);
        }
        Ok(self.pos)
    }

    #[inline]
    fn reserve(&mut self, n: usize) -> Result<&mut [u8]> {
        if n > self.remaining() {
            return Err(Error::Overflow { needed: n, remaining: self.remaining() });
        }
        let start = self.pos;
        self.pos += n;
        Ok(&mut self.buf[start..start + n])
    }
}

impl Sink for SliceWriter<'_> {
    fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    fn put_bytes(&mut self, v: &[u8]) -> Result<()> {
        self.reserve(v.len())?.copy_from_slice(v);
        Ok(())
    }

    #[inline]
    fn put<T: Primitive>(&mut self, v: T) -> Result<()> {
        v.write_le(self.reserve(T::SIZE)?);
        Ok(())
    }

    fn put_slice<T: Primitive>(&mut self, v: &[T]) -> Result<()> {
        let n = array_len::<T>(v.len())?;
        let dst = self.reserve(n)?;
        for (chunk, x) in dst.chunks_exact_mut(T::SIZE).zip(v) {
            x.write_le(chunk);
        }
        Ok(())
    }

    fn begin_sized_from(&mut self, origin: usize) -> Result<Scope> {
        let slot = self.pos;
        if origin > slot {
            return Err(Error::UnclosedScope);
        }
        self.reserve(4)?.copy_from_slice(&[0, 0, 0, 0]); // Length placeholder
        self.stack.push(slot);
        Ok(Scope { origin, slot })
    }

    fn end_sized(&mut self, scope: Scope) -> Result<u32> {
        match self.stack.pop() {
            Some(slot) if slot == scope.slot => {}
            _ => return Err(Error::UnclosedScope),
        }
        let size = (self.pos - scope.origin) as u64;
        let size = u32::try_from(size).map_err(|_| Error::TooLarge(size))?;
        self.buf[scope.slot..scope.slot + 4].copy_from_slice(&size.to_le_bytes());
        Ok(size)
    }
}
