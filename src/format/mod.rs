//! Container and TIFF structure parsing.
//!
//! Exif metadata reaches the decoder in one of three containers (a JPEG file,
//! a bare Exif APP1 payload, or a TIFF file). [`detect::locate_tiff`] finds
//! the TIFF structure inside the buffer and [`tiff`] decodes it.

pub mod detect;
pub mod jpeg;
pub mod tiff;

pub use detect::{detect_container, is_tiff_header, locate_tiff, Container};
pub use jpeg::find_exif_payload;
