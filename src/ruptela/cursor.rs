//! # Byte Cursor
//!
//! Bounds-checked sequential reader over a packet buffer.
//!
//! Every field read in the decoder goes through [`ByteCursor::take`]. A short
//! read returns [`OutOfData`] and leaves the offset untouched; the cursor never
//! indexes past the end of its buffer and never panics on malformed input.

use thiserror::Error;

/// Attempted to read past the end of the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("insufficient data: need {requested} bytes, have {remaining}")]
pub struct OutOfData {
    /// Number of bytes requested
    pub requested: usize,
    /// Number of bytes left in the buffer
    pub remaining: usize,
    /// Cursor offset at the failed read
    pub offset: usize,
}

/// Sequential big-endian reader over a byte slice
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor positioned at the start of `data`
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Current read offset
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bytes left to read
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Returns `true` if there are no more bytes to read
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Take the next `n` bytes
    ///
    /// # Errors
    ///
    /// Returns [`OutOfData`] when fewer than `n` bytes remain. The offset only
    /// advances on success.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], OutOfData> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(OutOfData {
                requested: n,
                remaining,
                offset: self.offset,
            });
        }

        let start = self.offset;
        self.offset += n;
        Ok(&self.data[start..self.offset])
    }

    /// Take the next `N` bytes as a fixed-size array
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], OutOfData> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Read one byte
    pub fn read_u8(&mut self) -> Result<u8, OutOfData> {
        Ok(self.take(1)?[0])
    }

    /// Read a big-endian `u16`
    pub fn read_u16(&mut self) -> Result<u16, OutOfData> {
        self.read_array::<2>().map(u16::from_be_bytes)
    }

    /// Read a big-endian `u32`
    pub fn read_u32(&mut self) -> Result<u32, OutOfData> {
        self.read_array::<4>().map(u32::from_be_bytes)
    }

    /// Read a big-endian `i16`
    pub fn read_i16(&mut self) -> Result<i16, OutOfData> {
        self.read_array::<2>().map(i16::from_be_bytes)
    }

    /// Read a big-endian `i32`
    pub fn read_i32(&mut self) -> Result<i32, OutOfData> {
        self.read_array::<4>().map(i32::from_be_bytes)
    }

    /// Read a big-endian unsigned integer of `width` bytes (1 or 2) into a `u16`
    pub fn read_uint16(&mut self, width: usize) -> Result<u16, OutOfData> {
        let bytes = self.take(width)?;
        Ok(bytes
            .iter()
            .fold(0u16, |acc, &byte| (acc << 8) | u16::from(byte)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_advances_offset() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut cursor = ByteCursor::new(&data);

        assert_eq!(cursor.take(1).unwrap(), &[0x01]);
        assert_eq!(cursor.offset(), 1);
        assert_eq!(cursor.take(3).unwrap(), &[0x02, 0x03, 0x04]);
        assert_eq!(cursor.offset(), 4);
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_take_past_end_reports_context() {
        let data = [0x01, 0x02, 0x03];
        let mut cursor = ByteCursor::new(&data);
        cursor.take(2).unwrap();

        let err = cursor.take(4).unwrap_err();
        assert_eq!(
            err,
            OutOfData {
                requested: 4,
                remaining: 1,
                offset: 2,
            }
        );
        assert_eq!(err.to_string(), "insufficient data: need 4 bytes, have 1");
    }

    #[test]
    fn test_failed_take_does_not_advance() {
        let data = [0xAA, 0xBB];
        let mut cursor = ByteCursor::new(&data);

        assert!(cursor.take(3).is_err());
        assert_eq!(cursor.offset(), 0);
        assert_eq!(cursor.read_u16().unwrap(), 0xAABB);
    }

    #[test]
    fn test_take_zero_on_empty_buffer() {
        let mut cursor = ByteCursor::new(&[]);
        assert_eq!(cursor.take(0).unwrap(), &[] as &[u8]);
        assert!(cursor.read_u8().is_err());
    }

    #[test]
    fn test_take_huge_request_does_not_overflow() {
        let data = [0x00; 4];
        let mut cursor = ByteCursor::new(&data);
        cursor.take(1).unwrap();

        let err = cursor.take(usize::MAX).unwrap_err();
        assert_eq!(err.remaining, 3);
        assert_eq!(cursor.offset(), 1);
    }

    #[test]
    fn test_big_endian_reads() {
        let data = [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE];
        let mut cursor = ByteCursor::new(&data);

        assert_eq!(cursor.read_u32().unwrap(), 0x1234_5678);
        assert_eq!(cursor.read_u16().unwrap(), 0x9ABC);
        assert_eq!(cursor.read_u8().unwrap(), 0xDE);
    }

    #[test]
    fn test_signed_reads() {
        let data = [0xFF, 0x83, 0xF1, 0xEE, 0x3C, 0x40];
        let mut cursor = ByteCursor::new(&data);

        assert_eq!(cursor.read_i16().unwrap(), -125);
        assert_eq!(cursor.read_i32().unwrap(), -236_045_248);
    }

    #[test]
    fn test_read_uint16_widths() {
        let data = [0x7F, 0x01, 0x02];
        let mut cursor = ByteCursor::new(&data);

        assert_eq!(cursor.read_uint16(1).unwrap(), 0x007F);
        assert_eq!(cursor.read_uint16(2).unwrap(), 0x0102);
    }

    #[test]
    fn test_read_array() {
        let data = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        let mut cursor = ByteCursor::new(&data);

        let arr: [u8; 8] = cursor.read_array().unwrap();
        assert_eq!(arr, [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(cursor.remaining(), 1);
    }
}
