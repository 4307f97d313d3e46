//! JPEG container handling.
//!
//! Exif metadata in a JPEG file lives in an APP1 segment whose payload starts
//! with the six-byte identifier `Exif\0\0`, followed by a complete TIFF
//! structure. Offsets inside that structure are relative to the TIFF header,
//! not to the start of the file.
//!
//! # Segment Layout
//!
//! ```text
//! FFD8                      SOI
//! FFE0 len  JFIF...         APP0 (optional)
//! FFE1 len  Exif\0\0 II*\0  APP1 (Exif)
//! ...                       DQT, DHT, SOF, ...
//! FFDA len  ...             SOS, entropy-coded data follows
//! ```
//!
//! Only the marker segments before SOS are walked; Exif never appears after
//! the scan starts.

use std::ops::Range;

use tracing::trace;

use crate::error::ExifError;

// =============================================================================
// JPEG Markers
// =============================================================================

/// Start Of Image marker
pub const SOI: [u8; 2] = [0xFF, 0xD8];

/// End Of Image marker
pub const EOI: [u8; 2] = [0xFF, 0xD9];

/// Start Of Scan marker
pub const SOS: [u8; 2] = [0xFF, 0xDA];

/// Application segment 1 (Exif, XMP) marker
pub const APP1: [u8; 2] = [0xFF, 0xE1];

/// Identifier at the start of an Exif APP1 payload (the sixth byte is padding)
pub const EXIF_IDENTIFIER: &[u8; 5] = b"Exif\0";

/// Length of the Exif identifier including its padding byte
pub const EXIF_HEADER_SIZE: usize = 6;

/// Check whether data starts with the JPEG SOI marker.
pub fn is_jpeg(data: &[u8]) -> bool {
    data.len() >= 2 && data[..2] == SOI
}

/// Check whether data starts with the Exif identifier.
pub fn has_exif_header(data: &[u8]) -> bool {
    data.len() >= EXIF_HEADER_SIZE && data[..EXIF_IDENTIFIER.len()] == EXIF_IDENTIFIER[..]
}

/// Markers that stand alone without a length field.
fn is_standalone(marker: u8) -> bool {
    // TEM and RST0-RST7
    marker == 0x01 || (0xD0..=0xD7).contains(&marker)
}

/// Locate the TIFF payload of the first Exif APP1 segment.
///
/// Returns the byte range of the TIFF structure (after the Exif identifier)
/// within `data`.
///
/// # Errors
/// - `MalformedSegment` if the data does not start with SOI, a marker is
///   missing where one is expected, or a segment length is invalid
/// - `OutOfBounds` if a segment extends past the end of the data
/// - `NoExifData` if SOS, EOI or the end of the data is reached first
pub fn find_exif_payload(data: &[u8]) -> Result<Range<usize>, ExifError> {
    if !is_jpeg(data) {
        return Err(ExifError::MalformedSegment {
            offset: 0,
            reason: "missing SOI marker".to_string(),
        });
    }

    let mut pos = SOI.len();
    while pos < data.len() {
        if data[pos] != 0xFF {
            return Err(ExifError::MalformedSegment {
                offset: pos as u64,
                reason: format!("expected marker, found 0x{:02X}", data[pos]),
            });
        }

        // Fill bytes: any number of 0xFF may precede a marker code
        let mut code_pos = pos + 1;
        while code_pos < data.len() && data[code_pos] == 0xFF {
            code_pos += 1;
        }
        let Some(&code) = data.get(code_pos) else {
            break;
        };
        let marker = [0xFF, code];

        if marker == SOS || marker == EOI {
            trace!(offset = pos, marker = code, "reached end of marker segments");
            break;
        }
        if is_standalone(code) {
            pos = code_pos + 1;
            continue;
        }

        let length_pos = code_pos + 1;
        let length_bytes = data
            .get(length_pos..length_pos + 2)
            .ok_or(ExifError::OutOfBounds {
                offset: length_pos as u64,
                requested: 2,
                size: data.len() as u64,
            })?;
        let length = u16::from_be_bytes([length_bytes[0], length_bytes[1]]) as usize;
        if length < 2 {
            return Err(ExifError::MalformedSegment {
                offset: pos as u64,
                reason: format!("segment length {} is shorter than its length field", length),
            });
        }

        let payload_start = length_pos + 2;
        let segment_end = length_pos + length;
        if segment_end > data.len() {
            return Err(ExifError::OutOfBounds {
                offset: payload_start as u64,
                requested: (length - 2) as u64,
                size: data.len() as u64,
            });
        }

        trace!(offset = pos, marker = code, length, "JPEG segment");

        let payload = &data[payload_start..segment_end];
        if marker == APP1 && has_exif_header(payload) {
            return Ok(payload_start + EXIF_HEADER_SIZE..segment_end);
        }

        pos = segment_end;
    }

    Err(ExifError::NoExifData)
}

// =============================================================================
// Tests
// =============================================================================
