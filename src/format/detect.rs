//! Container detection.
//!
//! The decoder accepts three kinds of input buffer:
//!
//! - **JPEG**: starts with SOI (`FFD8`); the TIFF structure is inside the
//!   Exif APP1 segment
//! - **Exif payload**: an APP1 payload already cut out of a JPEG, starting
//!   with `Exif\0\0`
//! - **TIFF**: anything else is treated as a bare TIFF structure and must
//!   start with a valid TIFF header
//!
//! Detection only looks at leading magic bytes. A buffer that matches none of
//! the signatures is handed to the TIFF header parser, which reports the
//! precise failure (usually `UnsupportedByteOrder`).

use std::ops::Range;

use serde::Serialize;

use crate::error::ExifError;

use super::jpeg::{find_exif_payload, has_exif_header, is_jpeg, EXIF_HEADER_SIZE};
use super::tiff::{ByteOrder, TIFF_HEADER_SIZE};

// =============================================================================
// Container
// =============================================================================

/// Detected input container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Container {
    /// JPEG file with an Exif APP1 segment
    Jpeg,

    /// Exif APP1 payload with its identifier
    ExifPayload,

    /// Bare TIFF structure
    Tiff,
}

impl Container {
    /// Get a human-readable name for the container.
    pub const fn name(&self) -> &'static str {
        match self {
            Container::Jpeg => "JPEG",
            Container::ExifPayload => "Exif payload",
            Container::Tiff => "TIFF",
        }
    }
}

// =============================================================================
// Detection
// =============================================================================

/// Classify a buffer by its leading magic bytes.
pub fn detect_container(data: &[u8]) -> Container {
    if is_jpeg(data) {
        Container::Jpeg
    } else if has_exif_header(data) {
        Container::ExifPayload
    } else {
        Container::Tiff
    }
}

/// Locate the TIFF structure within a buffer.
///
/// Returns the detected container and the byte range of the TIFF structure.
/// The range is not validated beyond what is needed to find it; header
/// validation happens when the TIFF header is parsed.
///
/// # Errors
/// For JPEG input, any error from walking the marker segments, including
/// `NoExifData` when no Exif APP1 segment exists.
pub fn locate_tiff(data: &[u8]) -> Result<(Container, Range<usize>), ExifError> {
    let container = detect_container(data);
    let range = match container {
        Container::Jpeg => find_exif_payload(data)?,
        Container::ExifPayload => EXIF_HEADER_SIZE..data.len(),
        Container::Tiff => 0..data.len(),
    };
    Ok((container, range))
}

/// Check if bytes start with a classic TIFF header.
///
/// This is a quick check that can be used before attempting full parsing.
pub fn is_tiff_header(bytes: &[u8]) -> bool {
    if bytes.len() < TIFF_HEADER_SIZE {
        return false;
    }

    let Ok(byte_order) = ByteOrder::from_marker([bytes[0], bytes[1]]) else {
        return false;
    };

    byte_order.read_u16(&bytes[2..4]) == 42
}

// =============================================================================
// Tests
// =============================================================================
