//! TIFF header parsing.
//!
//! Exif payloads are classic TIFF structures: every offset inside them is
//! relative to the first byte of this header.
//!
//! # TIFF Header Structure
//!
//! ```text
//! Bytes 0-1: Byte order (0x4949 = little-endian "II", 0x4D4D = big-endian "MM")
//! Bytes 2-3: Version (42 = 0x002A)
//! Bytes 4-7: Offset to the primary directory (IFD0)
//! ```

use crate::error::ExifError;
use crate::io::{read_u16_be, read_u16_le, read_u32_be, read_u32_le, read_u64_be, read_u64_le};

// =============================================================================
// Constants
// =============================================================================

/// Magic bytes indicating little-endian byte order ("II" for Intel)
const BYTE_ORDER_LITTLE_ENDIAN: u16 = 0x4949;

/// Magic bytes indicating big-endian byte order ("MM" for Motorola)
const BYTE_ORDER_BIG_ENDIAN: u16 = 0x4D4D;

/// Version number for classic TIFF
const VERSION_TIFF: u16 = 42;

/// Size of the TIFF header in bytes
pub const TIFF_HEADER_SIZE: usize = 8;

// =============================================================================
// ByteOrder
// =============================================================================

/// Byte order (endianness) of a TIFF payload.
///
/// Declared by the first two bytes of the header. All multi-byte values in
/// the payload must be read respecting this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Little-endian ("II" = Intel)
    LittleEndian,
    /// Big-endian ("MM" = Motorola)
    BigEndian,
}

impl ByteOrder {
    /// Detect the byte order from the two marker bytes.
    pub fn from_marker(marker: [u8; 2]) -> Result<Self, ExifError> {
        // Read as little-endian because we're checking for specific byte patterns
        match u16::from_le_bytes(marker) {
            BYTE_ORDER_LITTLE_ENDIAN => Ok(ByteOrder::LittleEndian),
            BYTE_ORDER_BIG_ENDIAN => Ok(ByteOrder::BigEndian),
            other => Err(ExifError::UnsupportedByteOrder(other)),
        }
    }

    /// Read a u16 from a byte slice using this byte order.
    #[inline]
    pub fn read_u16(self, bytes: &[u8]) -> u16 {
        match self {
            ByteOrder::LittleEndian => read_u16_le(bytes),
            ByteOrder::BigEndian => read_u16_be(bytes),
        }
    }

    /// Read a u32 from a byte slice using this byte order.
    #[inline]
    pub fn read_u32(self, bytes: &[u8]) -> u32 {
        match self {
            ByteOrder::LittleEndian => read_u32_le(bytes),
            ByteOrder::BigEndian => read_u32_be(bytes),
        }
    }

    /// Read a u64 from a byte slice using this byte order.
    #[inline]
    pub fn read_u64(self, bytes: &[u8]) -> u64 {
        match self {
            ByteOrder::LittleEndian => read_u64_le(bytes),
            ByteOrder::BigEndian => read_u64_be(bytes),
        }
    }

    /// Short human-readable name ("II" / "MM").
    pub const fn marker(self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "II",
            ByteOrder::BigEndian => "MM",
        }
    }
}

// =============================================================================
// TiffHeader
// =============================================================================

/// Parsed TIFF header of an Exif payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffHeader {
    /// Byte order for all multi-byte values in the payload
    pub byte_order: ByteOrder,

    /// Offset to the primary directory (IFD0)
    pub first_ifd_offset: u32,
}

impl TiffHeader {
    /// Parse a TIFF header from the start of `bytes`.
    ///
    /// # Errors
    /// - `UnsupportedByteOrder` if byte order bytes are not II or MM
    /// - `OutOfBounds` if there aren't enough bytes for the header
    /// - `InvalidVersion` if the version is not 42
    /// - `MalformedDirectory` if the first directory offset lies inside the
    ///   header or past the end of the buffer
    pub fn parse(bytes: &[u8]) -> Result<Self, ExifError> {
        if bytes.len() >= 2 {
            ByteOrder::from_marker([bytes[0], bytes[1]])?;
        }

        if bytes.len() < TIFF_HEADER_SIZE {
            return Err(ExifError::OutOfBounds {
                offset: 0,
                requested: TIFF_HEADER_SIZE as u64,
                size: bytes.len() as u64,
            });
        }

        let byte_order = ByteOrder::from_marker([bytes[0], bytes[1]])?;

        let version = byte_order.read_u16(&bytes[2..4]);
        if version != VERSION_TIFF {
            return Err(ExifError::InvalidVersion(version));
        }

        let first_ifd_offset = byte_order.read_u32(&bytes[4..8]);
        if (first_ifd_offset as usize) < TIFF_HEADER_SIZE
            || first_ifd_offset as usize >= bytes.len()
        {
            return Err(ExifError::malformed(
                first_ifd_offset,
                "primary directory offset outside the payload",
            ));
        }

        Ok(TiffHeader {
            byte_order,
            first_ifd_offset,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
