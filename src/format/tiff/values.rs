//! Typed tag values.
//!
//! A directory entry declares a field type and a count; the bytes backing
//! the value are either the 4-byte inline field or a run of bytes at an
//! offset. This module turns those bytes into a [`TagValue`].
//!
//! Large opaque payloads (`BYTE` / `UNDEFINED` longer than
//! [`BLOB_THRESHOLD`]) are not copied. They are recorded as a [`BlobRef`]
//! and materialized on request from the owning buffer.

use std::fmt;

use serde::Serialize;

use crate::error::ExifError;

use super::parser::ByteOrder;
use super::tags::FieldType;

/// Opaque payloads longer than this many bytes stay in the source buffer.
pub const BLOB_THRESHOLD: u64 = 64;

/// Maximum number of array elements rendered by `Display`.
const DISPLAY_LIMIT: usize = 16;

// =============================================================================
// Rational Numbers
// =============================================================================

/// Unsigned rational number (`RATIONAL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rational {
    pub numerator: u32,
    pub denominator: u32,
}

impl Rational {
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Decimal value of the fraction.
    ///
    /// A zero denominator is an error, never infinity or NaN.
    pub fn to_f64(self) -> Result<f64, ExifError> {
        if self.denominator == 0 {
            return Err(ExifError::DivisionByZero);
        }
        Ok(self.numerator as f64 / self.denominator as f64)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Signed rational number (`SRATIONAL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SRational {
    pub numerator: i32,
    pub denominator: i32,
}

impl SRational {
    pub const fn new(numerator: i32, denominator: i32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Decimal value of the fraction.
    pub fn to_f64(self) -> Result<f64, ExifError> {
        if self.denominator == 0 {
            return Err(ExifError::DivisionByZero);
        }
        Ok(self.numerator as f64 / self.denominator as f64)
    }
}

impl fmt::Display for SRational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

// =============================================================================
// BlobRef
// =============================================================================

/// Location of an opaque payload that was left in the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlobRef {
    /// Declared field type (`BYTE` or `UNDEFINED`)
    pub field_type: FieldType,
    /// Absolute offset within the TIFF payload
    pub offset: u32,
    /// Length in bytes
    pub len: u32,
}

// =============================================================================
// TagValue
// =============================================================================

/// A decoded tag value.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Byte(Vec<u8>),
    /// Text up to the first NUL
    Ascii(String),
    Short(Vec<u16>),
    /// `LONG` and `IFD` values
    Long(Vec<u32>),
    Rational(Vec<Rational>),
    SByte(Vec<i8>),
    Undefined(Vec<u8>),
    SShort(Vec<i16>),
    SLong(Vec<i32>),
    SRational(Vec<SRational>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    /// Large `BYTE`/`UNDEFINED` payload kept by reference
    Blob(BlobRef),
}

impl TagValue {
    /// Number of elements (bytes for text and opaque data).
    pub fn len(&self) -> usize {
        match self {
            TagValue::Byte(v) | TagValue::Undefined(v) => v.len(),
            TagValue::Ascii(s) => s.len(),
            TagValue::Short(v) => v.len(),
            TagValue::Long(v) => v.len(),
            TagValue::Rational(v) => v.len(),
            TagValue::SByte(v) => v.len(),
            TagValue::SShort(v) => v.len(),
            TagValue::SLong(v) => v.len(),
            TagValue::SRational(v) => v.len(),
            TagValue::Float(v) => v.len(),
            TagValue::Double(v) => v.len(),
            TagValue::Blob(blob) => blob.len as usize,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Text content of an `ASCII` value.
    pub fn as_ascii(&self) -> Option<&str> {
        match self {
            TagValue::Ascii(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Single unsigned integer from a one-element `BYTE`, `SHORT` or `LONG`.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            TagValue::Byte(v) if v.len() == 1 => Some(v[0] as u32),
            TagValue::Short(v) if v.len() == 1 => Some(v[0] as u32),
            TagValue::Long(v) if v.len() == 1 => Some(v[0]),
            _ => None,
        }
    }

    /// Elements of a `RATIONAL` value.
    pub fn as_rationals(&self) -> Option<&[Rational]> {
        match self {
            TagValue::Rational(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Inline bytes of a `BYTE` or `UNDEFINED` value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            TagValue::Byte(v) | TagValue::Undefined(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Reference to a payload left in the buffer.
    pub fn as_blob(&self) -> Option<&BlobRef> {
        match self {
            TagValue::Blob(blob) => Some(blob),
            _ => None,
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &[T]) -> fmt::Result {
    for (i, value) in values.iter().take(DISPLAY_LIMIT).enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", value)?;
    }
    if values.len() > DISPLAY_LIMIT {
        write!(f, ", ... ({} values)", values.len())?;
    }
    Ok(())
}

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    for (i, byte) in bytes.iter().take(DISPLAY_LIMIT).enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{:02X}", byte)?;
    }
    if bytes.len() > DISPLAY_LIMIT {
        write!(f, " ... ({} bytes)", bytes.len())?;
    }
    Ok(())
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Ascii(s) => f.write_str(s),
            TagValue::Byte(v) | TagValue::Undefined(v) => write_hex(f, v),
            TagValue::Short(v) => write_list(f, v),
            TagValue::Long(v) => write_list(f, v),
            TagValue::Rational(v) => write_list(f, v),
            TagValue::SByte(v) => write_list(f, v),
            TagValue::SShort(v) => write_list(f, v),
            TagValue::SLong(v) => write_list(f, v),
            TagValue::SRational(v) => write_list(f, v),
            TagValue::Float(v) => write_list(f, v),
            TagValue::Double(v) => write_list(f, v),
            TagValue::Blob(blob) => write!(f, "<{} bytes at offset {}>", blob.len, blob.offset),
        }
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode `count` values of `field_type` from `bytes`.
///
/// `bytes` must be exactly `field_type.size_in_bytes() * count` long; any
/// other length is a [`ExifError::ValueLengthMismatch`].
pub fn decode_value(
    field_type: FieldType,
    count: u32,
    bytes: &[u8],
    byte_order: ByteOrder,
) -> Result<TagValue, ExifError> {
    let expected = field_type.byte_len(count);
    if bytes.len() as u64 != expected {
        return Err(ExifError::ValueLengthMismatch {
            expected,
            actual: bytes.len() as u64,
        });
    }

    let value = match field_type {
        FieldType::Byte => TagValue::Byte(bytes.to_vec()),
        FieldType::Undefined => TagValue::Undefined(bytes.to_vec()),
        FieldType::SByte => TagValue::SByte(bytes.iter().map(|&b| b as i8).collect()),
        FieldType::Ascii => TagValue::Ascii(decode_ascii(bytes)),
        FieldType::Short => TagValue::Short(
            bytes
                .chunks_exact(2)
                .map(|c| byte_order.read_u16(c))
                .collect(),
        ),
        FieldType::SShort => TagValue::SShort(
            bytes
                .chunks_exact(2)
                .map(|c| byte_order.read_u16(c) as i16)
                .collect(),
        ),
        FieldType::Long | FieldType::Ifd => TagValue::Long(
            bytes
                .chunks_exact(4)
                .map(|c| byte_order.read_u32(c))
                .collect(),
        ),
        FieldType::SLong => TagValue::SLong(
            bytes
                .chunks_exact(4)
                .map(|c| byte_order.read_u32(c) as i32)
                .collect(),
        ),
        FieldType::Rational => TagValue::Rational(
            bytes
                .chunks_exact(8)
                .map(|c| Rational::new(byte_order.read_u32(&c[..4]), byte_order.read_u32(&c[4..])))
                .collect(),
        ),
        FieldType::SRational => TagValue::SRational(
            bytes
                .chunks_exact(8)
                .map(|c| {
                    SRational::new(
                        byte_order.read_u32(&c[..4]) as i32,
                        byte_order.read_u32(&c[4..]) as i32,
                    )
                })
                .collect(),
        ),
        FieldType::Float => TagValue::Float(
            bytes
                .chunks_exact(4)
                .map(|c| f32::from_bits(byte_order.read_u32(c)))
                .collect(),
        ),
        FieldType::Double => TagValue::Double(
            bytes
                .chunks_exact(8)
                .map(|c| f64::from_bits(byte_order.read_u64(c)))
                .collect(),
        ),
    };

    Ok(value)
}

/// Convert ASCII field bytes to a string.
///
/// The string ends at the first NUL; bytes that are not valid UTF-8 are
/// replaced rather than rejected, since many cameras write Latin-1 here.
fn decode_ascii(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

// =============================================================================
// Tests
// =============================================================================
