//! Bounds-checked, endian-aware reads over a borrowed buffer.
//!
//! Every read takes an absolute offset into the TIFF payload. A read that
//! would extend past the end of the buffer returns
//! [`ExifError::OutOfBounds`]; nothing here panics or slices blindly.

use crate::error::ExifError;

use super::parser::ByteOrder;
use super::values::{Rational, SRational};

/// Cursor-free reader over an immutable byte buffer.
///
/// The reader is `Copy` and holds no mutable state, so it can be shared
/// freely between directory parsers.
#[derive(Debug, Clone, Copy)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    byte_order: ByteOrder,
}

impl<'a> ByteReader<'a> {
    /// Create a reader over `data` using `byte_order` for multi-byte values.
    pub fn new(data: &'a [u8], byte_order: ByteOrder) -> Self {
        Self { data, byte_order }
    }

    /// Byte order used for all reads.
    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Total length of the underlying buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow `len` bytes starting at `offset`.
    pub fn read_bytes(&self, offset: u64, len: u64) -> Result<&'a [u8], ExifError> {
        let size = self.data.len() as u64;
        let end = offset
            .checked_add(len)
            .filter(|&end| end <= size)
            .ok_or(ExifError::OutOfBounds {
                offset,
                requested: len,
                size,
            })?;

        // Both bounds are <= data.len(), so the casts are lossless.
        Ok(&self.data[offset as usize..end as usize])
    }

    pub fn read_u8(&self, offset: u64) -> Result<u8, ExifError> {
        Ok(self.read_bytes(offset, 1)?[0])
    }

    pub fn read_u16(&self, offset: u64) -> Result<u16, ExifError> {
        let bytes = self.read_bytes(offset, 2)?;
        Ok(self.byte_order.read_u16(bytes))
    }

    pub fn read_u32(&self, offset: u64) -> Result<u32, ExifError> {
        let bytes = self.read_bytes(offset, 4)?;
        Ok(self.byte_order.read_u32(bytes))
    }

    pub fn read_i32(&self, offset: u64) -> Result<i32, ExifError> {
        Ok(self.read_u32(offset)? as i32)
    }

    /// Read an unsigned rational (two consecutive u32 values).
    pub fn read_rational(&self, offset: u64) -> Result<Rational, ExifError> {
        let bytes = self.read_bytes(offset, 8)?;
        Ok(Rational::new(
            self.byte_order.read_u32(&bytes[..4]),
            self.byte_order.read_u32(&bytes[4..]),
        ))
    }

    /// Read a signed rational (two consecutive i32 values).
    pub fn read_srational(&self, offset: u64) -> Result<SRational, ExifError> {
        let bytes = self.read_bytes(offset, 8)?;
        Ok(SRational::new(
            self.byte_order.read_u32(&bytes[..4]) as i32,
            self.byte_order.read_u32(&bytes[4..]) as i32,
        ))
    }
}

// =============================================================================
// Tests
// =============================================================================
