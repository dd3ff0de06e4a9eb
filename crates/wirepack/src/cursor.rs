use crate::error::Error;
use crate::error::Result;
use crate::primitive::Primitive;
use crate::varint;

/// A cursor tracks position within a borrowed buffer slice.
///
/// Every read checks bounds first and reports `Error::Truncated` without
/// advancing. Variable-length reads check the declared length against the
/// remaining bytes before anything is allocated.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    slice: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create cursor at start of slice
    pub fn new(slice: &'a [u8]) -> Self {
        Self { slice, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.slice.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    #[inline]
    pub fn need(&self, n: usize) -> Result<()> {
        if n > self.remaining() {
            Err(Error::Truncated { needed: n, remaining: self.remaining() })
        } else {
            Ok(())
        }
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.need(len)?;
        let bytes = &self.slice[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.need(len)?;
        self.pos += len;
        Ok(())
    }

    /// Splits off the next `len` bytes as an independent, bounded cursor.
    pub fn take(&mut self, len: usize) -> Result<Cursor<'a>> {
        Ok(Cursor::new(self.read_bytes(len)?))
    }

    #[inline]
    pub fn read<T: Primitive>(&mut self) -> Result<T> {
        Ok(T::read_le(self.read_bytes(T::SIZE)?))
    }

    /// Reads `count` fixed-width values.
    pub fn read_slice<T: Primitive>(&mut self, count: usize) -> Result<Vec<T>> {
        let len = count
            .checked_mul(T::SIZE)
            .ok_or(Error::TooLarge(count as u64))?;
        let bytes = self.read_bytes(len)?;
        Ok(bytes.chunks_exact(T::SIZE).map(T::read_le).collect())
    }

    pub fn read_uint_x(&mut self) -> Result<u64> {
        let marker = self.read::<u8>()?;
        let (v, min) = match marker {
            0..=varint::UINT_X_INLINE_MAX => return Ok(marker as u64),
            varint::UINT_X_U16 => (self.read::<u16>()? as u64, varint::UINT_X_INLINE_MAX as u64),
            varint::UINT_X_U32 => (self.read::<u32>()? as u64, u16::MAX as u64),
            _ => (self.read::<u64>()?, u32::MAX as u64),
        };
        if v <= min {
            return Err(Error::NonCanonicalVarint);
        }
        Ok(v)
    }

    pub fn read_int_x(&mut self) -> Result<i64> {
        let marker = self.read::<i8>()?;
        if varint::INT_X_INLINE.contains(&(marker as i64)) {
            return Ok(marker as i64);
        }
        let (v, inner) = match marker {
            varint::INT_X_I16 => (self.read::<i16>()? as i64, varint::INT_X_INLINE),
            varint::INT_X_I32 => (self.read::<i32>()? as i64, i16::MIN as i64..=i16::MAX as i64),
            varint::INT_X_I64 => (self.read::<i64>()?, i32::MIN as i64..=i32::MAX as i64),
            _ => return Err(Error::NonCanonicalVarint),
        };
        if inner.contains(&v) {
            return Err(Error::NonCanonicalVarint);
        }
        Ok(v)
    }

    /// Reads a `uint_x` that has to be used as an in-memory length.
    pub fn read_len(&mut self) -> Result<usize> {
        let v = self.read_uint_x()?;
        usize::try_from(v).map_err(|_| Error::TooLarge(v))
    }

    /// Reads a length-prefixed blob.
    pub fn read_blob(&mut self) -> Result<&'a [u8]> {
        let len = self.read_len()?;
        self.read_bytes(len)
    }

    /// Reads a length-prefixed UTF-8 string.
    pub fn read_str(&mut self) -> Result<&'a str> {
        let bytes = self.read_blob()?;
        std::str::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_need_checks_without_consuming() -> Result<()> {
        // u16 0x0102, a three-byte uint_x of 300, then two padding bytes.
        let data = [0x02, 0x01, 0xFD, 0x2C, 0x01, 0xAA, 0xBB];
        let mut cursor = Cursor::new(&data);

        cursor.need(7)?;
        match cursor.need(8) {
            Err(Error::Truncated { needed: 8, remaining: 7 }) => {}
            other => panic!("Expected Truncated, got {:?}", other),
        }
        assert_eq!(cursor.pos(), 0);

        assert_eq!(cursor.read::<u16>()?, 0x0102);
        assert_eq!(cursor.read_uint_x()?, 300);
        cursor.skip(2)?;
        assert!(cursor.is_empty());
        Ok(())
    }

    #[test]
    fn cursor_truncated_does_not_advance() {
        let data = b"short";
        let mut cursor = Cursor::new(data);

        match cursor.read_bytes(10) {
            Err(Error::Truncated { needed: 10, remaining: 5 }) => {}
            other => panic!("Expected Truncated, got {:?}", other),
        }
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn cursor_take_is_bounded() -> Result<()> {
        let data = [1u8, 2, 3, 4, 5];
        let mut cursor = Cursor::new(&data);

        let mut inner = cursor.take(2)?;
        assert_eq!(cursor.pos(), 2);
        assert_eq!(inner.read::<u8>()?, 1);
        assert_eq!(inner.read::<u8>()?, 2);
        assert!(inner.read::<u8>().is_err());
        assert_eq!(cursor.read::<u8>()?, 3);
        Ok(())
    }

    #[test]
    fn cursor_lying_count_fails_before_allocating() {
        // Claims u32::MAX doubles with only two bytes behind it.
        let data = [0u8, 0];
        let mut cursor = Cursor::new(&data);
        match cursor.read_slice::<f64>(u32::MAX as usize) {
            Err(Error::Truncated { remaining: 2, .. }) => {}
            other => panic!("Expected Truncated, got {:?}", other),
        }
    }
}
