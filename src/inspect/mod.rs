//! End-to-end inspection of image files.
//!
//! This layer sits on top of the decoder: it loads files through an
//! [`ImageSource`](crate::io::ImageSource), decodes them with
//! [`MetadataModel`](crate::metadata::MetadataModel) and turns the result
//! into serializable [`FileReport`]s.

mod report;
mod service;

pub use report::{
    render_gps, render_text, sha256_hex, DirectoryReport, EntryReport, FileReport, GpsItem,
    GpsStatus, ReportItem, ThumbnailStatus,
};
pub use service::{FileOutcome, Inspector, DEFAULT_JOBS};
