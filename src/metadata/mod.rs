//! Decoded metadata and values derived from it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            input buffer                 │
//! │      (JPEG, Exif payload or TIFF)       │
//! └────────────────────┬────────────────────┘
//!                      │ locate_tiff
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │     TiffHeader → SubdirectoryResolver   │
//! │  (IFD0, Exif, GPS, Interop, MakerNote,  │
//! │   IFD1 decoded into a DirectoryTree)    │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │            MetadataModel                │
//! │  (tag lookup, GPS, thumbnail, blobs)    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use exif_inspector::metadata::MetadataModel;
//! use exif_inspector::format::tiff::{DirectoryKind, ExifTag};
//!
//! let model = MetadataModel::parse(std::fs::read("photo.jpg")?)?;
//! let make = model.get_tag(DirectoryKind::Primary, ExifTag::Make.as_u16());
//! if let Some(position) = model.gps_coordinate()? {
//!     println!("{}, {}", position.latitude, position.longitude);
//! }
//! ```

pub mod gps;
mod model;

pub use gps::GpsCoordinate;
pub use model::MetadataModel;
