//! Binary cursors used to read and write wire fields.

use crate::error::{StunError, StunErrorType};
use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

const U32_SIZE: usize = 4;
const U16_SIZE: usize = 2;

/// Bounds-checked big-endian reader over a borrowed buffer.
#[derive(Debug, Clone)]
pub struct ReadCursor<'a> {
    buffer: &'a [u8],
    pos: usize,
}

impl<'a> ReadCursor<'a> {
    /// Creates a cursor positioned at the start of `buffer`.
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, pos: 0 }
    }

    /// Returns the number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.pos
    }

    /// Returns true if there is nothing left to read.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, size: usize) -> Result<&'a [u8], StunError> {
        if self.remaining() < size {
            return Err(StunError::new(
                StunErrorType::TruncatedData,
                format!(
                    "Required size: {}, remaining: {} (offset {})",
                    size,
                    self.remaining(),
                    self.pos
                ),
            ));
        }
        let bytes = &self.buffer[self.pos..self.pos + size];
        self.pos += size;
        Ok(bytes)
    }

    /// Reads one byte.
    pub fn read_u8(&mut self) -> Result<u8, StunError> {
        Ok(self.take(1)?[0])
    }

    /// Reads a big-endian [`u16`].
    pub fn read_u16(&mut self) -> Result<u16, StunError> {
        Ok(BigEndian::read_u16(self.take(U16_SIZE)?))
    }

    /// Reads a big-endian [`u32`].
    pub fn read_u32(&mut self) -> Result<u32, StunError> {
        Ok(BigEndian::read_u32(self.take(U32_SIZE)?))
    }

    /// Reads `size` raw bytes.
    pub fn read_bytes(&mut self, size: usize) -> Result<&'a [u8], StunError> {
        self.take(size)
    }

    /// Reads a fixed size array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], StunError> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }

    /// Skips `size` bytes.
    pub fn skip(&mut self, size: usize) -> Result<(), StunError> {
        self.take(size).map(|_| ())
    }
}

/// Big-endian writer appending to a growable buffer.
#[derive(Debug, Default, Clone)]
pub struct WriteCursor {
    buffer: Vec<u8>,
}

impl WriteCursor {
    /// Creates an empty writer with room for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of bytes written so far.
    pub fn position(&self) -> usize {
        self.buffer.len()
    }

    /// Returns the bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Appends one byte.
    pub fn write_u8(&mut self, value: u8) -> Result<usize, StunError> {
        self.buffer.write_u8(value)?;
        Ok(1)
    }

    /// Appends a big-endian [`u16`].
    pub fn write_u16(&mut self, value: u16) -> Result<usize, StunError> {
        self.buffer.write_u16::<BigEndian>(value)?;
        Ok(U16_SIZE)
    }

    /// Appends a big-endian [`u32`].
    pub fn write_u32(&mut self, value: u32) -> Result<usize, StunError> {
        self.buffer.write_u32::<BigEndian>(value)?;
        Ok(U32_SIZE)
    }

    /// Appends raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<usize, StunError> {
        self.buffer.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    /// Appends `size` zero bytes.
    pub fn write_zeros(&mut self, size: usize) -> Result<usize, StunError> {
        self.buffer.resize(self.buffer.len() + size, 0x00);
        Ok(size)
    }

    /// Overwrites a 16-bit field that has already been written.
    pub fn patch_u16(&mut self, at: usize, value: u16) -> Result<(), StunError> {
        if at + U16_SIZE > self.buffer.len() {
            return Err(StunError::new(
                StunErrorType::InvalidParam,
                format!(
                    "Can not patch offset {}, buffer size: {}",
                    at,
                    self.buffer.len()
                ),
            ));
        }
        BigEndian::write_u16(&mut self.buffer[at..at + U16_SIZE], value);
        Ok(())
    }

    /// Consumes the writer and returns the encoded bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_fields() {
        let buffer = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09];
        let mut cursor = ReadCursor::new(&buffer);
        assert_eq!(cursor.read_u8(), Ok(0x01));
        assert_eq!(cursor.read_u16(), Ok(0x0203));
        assert_eq!(cursor.read_u32(), Ok(0x04050607));
        assert_eq!(cursor.position(), 7);
        assert_eq!(cursor.remaining(), 2);
        assert_eq!(cursor.read_bytes(2), Ok([0x08, 0x09].as_ref()));
        assert!(cursor.is_empty());
    }

    #[test]
    fn read_past_end() {
        let buffer = [0x01, 0x02, 0x03];
        let mut cursor = ReadCursor::new(&buffer);
        assert_eq!(
            cursor.read_u32().expect_err("Error expected"),
            StunErrorType::TruncatedData
        );
        // A failed read does not move the cursor
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.read_u16(), Ok(0x0102));
        assert_eq!(
            cursor.read_u16().expect_err("Error expected"),
            StunErrorType::TruncatedData
        );
        assert_eq!(
            cursor.skip(2).expect_err("Error expected"),
            StunErrorType::TruncatedData
        );
        assert_eq!(cursor.read_array::<1>(), Ok([0x03]));
        assert_eq!(
            cursor.read_u8().expect_err("Error expected"),
            StunErrorType::TruncatedData
        );
    }

    #[test]
    fn write_fields() {
        let mut cursor = WriteCursor::default();
        assert_eq!(cursor.write_u16(0x0001), Ok(2));
        assert_eq!(cursor.write_u16(0x0000), Ok(2));
        assert_eq!(cursor.write_u32(0x2112_A442), Ok(4));
        assert_eq!(cursor.write_u8(0xff), Ok(1));
        assert_eq!(cursor.write_zeros(3), Ok(3));
        assert_eq!(cursor.write_bytes(&[0xaa, 0xbb]), Ok(2));
        cursor.patch_u16(2, 0x0010).expect("Can not patch length");
        assert_eq!(
            cursor.patch_u16(13, 0x0010).expect_err("Error expected"),
            StunErrorType::InvalidParam
        );

        assert_eq!(cursor.position(), 14);
        assert_eq!(
            cursor.into_inner(),
            vec![
                0x00, 0x01, 0x00, 0x10, 0x21, 0x12, 0xA4, 0x42, 0xff, 0x00, 0x00, 0x00, 0xaa, 0xbb
            ]
        );
    }
}
