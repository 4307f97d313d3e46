//! # exif-inspector
//!
//! A self-contained decoder for the Exif metadata embedded in JPEG and TIFF
//! images, with GPS position extraction.
//!
//! The decoder works on an in-memory buffer: it finds the TIFF structure
//! (inside a JPEG APP1 segment, after an `Exif\0\0` identifier, or at the
//! start of a TIFF file), walks every reachable tag directory and exposes the
//! result as an immutable [`MetadataModel`]. Malformed input produces typed
//! errors, never panics.
//!
//! ## Features
//!
//! - **Bounds-checked decoding**: every read is checked against the buffer
//! - **Both byte orders**: little-endian (II) and big-endian (MM) payloads
//! - **Cycle detection**: hostile directory offsets cannot cause loops
//! - **GPS**: signed decimal latitude, longitude and altitude
//! - **Zero-copy blobs**: large opaque values and thumbnails are handed out
//!   as slices of the original buffer
//!
//! ## Architecture
//!
//! - [`io`] - Image sources and endian helpers
//! - [`mod@format`] - Container detection, JPEG segment walk and TIFF decoding
//! - [`metadata`] - The decoded model and GPS computation
//! - [`inspect`] - Batch inspection and serializable reports
//! - [`config`] - CLI configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use exif_inspector::{DirectoryKind, ExifTag, MetadataModel};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let model = MetadataModel::parse(std::fs::read("photo.jpg")?)?;
//!
//!     if let Some(make) = model.get_tag(DirectoryKind::Primary, ExifTag::Make.as_u16()) {
//!         println!("Make: {}", make);
//!     }
//!     if let Some(position) = model.gps_coordinate()? {
//!         println!("Position: {}, {}", position.latitude, position.longitude);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod inspect;
pub mod io;
pub mod metadata;

// Re-export commonly used types
pub use config::{Cli, Command, CommonOptions, GpsConfig, InspectConfig, OutputFormat};
pub use error::{ExifError, InspectError, IoError};
pub use format::tiff::{
    BlobRef, ByteOrder, Directory, DirectoryKind, ExifTag, FieldType, GpsTag, InteropTag,
    Rational, SRational, TagEntry, TagValue, TiffHeader,
};
pub use format::{detect_container, locate_tiff, Container};
pub use inspect::{FileOutcome, FileReport, GpsStatus, Inspector, ThumbnailStatus};
pub use io::{ImageSource, LocalFileSource};
pub use metadata::{GpsCoordinate, MetadataModel};

/// Decode all Exif metadata from a JPEG, Exif payload or TIFF buffer.
///
/// Shorthand for [`MetadataModel::parse`].
pub fn parse(buffer: impl Into<bytes::Bytes>) -> Result<MetadataModel, ExifError> {
    MetadataModel::parse(buffer)
}
