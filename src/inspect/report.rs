//! Serializable inspection reports.
//!
//! A [`FileReport`] flattens a [`MetadataModel`] into plain strings and
//! numbers so it can be printed as text or emitted as JSON without exposing
//! the decoder's types to consumers.

use std::fmt::Write;

use bytes::Bytes;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::ExifError;
use crate::format::tiff::{tag_name, Directory, TagEntry};
use crate::format::Container;
use crate::metadata::{GpsCoordinate, MetadataModel};

use super::service::FileOutcome;

// =============================================================================
// Report Types
// =============================================================================

/// One decoded tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryReport {
    /// Tag id as `0xNNNN`
    pub tag: String,

    /// Well-known name, if the tag is in the table for its directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'static str>,

    /// Field type name (`ASCII`, `RATIONAL`, ...)
    pub field_type: &'static str,

    /// Number of values
    pub count: u32,

    /// Display form of the value
    pub value: String,
}

impl EntryReport {
    fn new(directory: &Directory, entry: &TagEntry) -> Self {
        Self {
            tag: format!("0x{:04X}", entry.tag_id),
            name: tag_name(directory.kind, entry.tag_id),
            field_type: entry.field_type.name(),
            count: entry.count,
            value: entry.value.to_string(),
        }
    }

    /// Name if known, otherwise the hex id.
    pub fn label(&self) -> &str {
        match self.name {
            Some(name) => name,
            None => &self.tag,
        }
    }
}

/// One decoded directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryReport {
    pub name: &'static str,
    pub offset: u32,
    pub entries: Vec<EntryReport>,
}

impl DirectoryReport {
    fn new(directory: &Directory) -> Self {
        Self {
            name: directory.kind.name(),
            offset: directory.offset,
            entries: directory
                .iter()
                .map(|entry| EntryReport::new(directory, entry))
                .collect(),
        }
    }
}

/// Outcome of the GPS computation for one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GpsStatus {
    /// No GPS directory, or latitude/longitude tags missing
    Absent,

    /// Position computed successfully
    Present(GpsCoordinate),

    /// GPS tags are present but could not be evaluated
    Invalid { error: String },
}

impl GpsStatus {
    pub fn from_result(result: Result<Option<GpsCoordinate>, ExifError>) -> Self {
        match result {
            Ok(Some(coordinate)) => GpsStatus::Present(coordinate),
            Ok(None) => GpsStatus::Absent,
            Err(err) => GpsStatus::Invalid {
                error: err.to_string(),
            },
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, GpsStatus::Invalid { .. })
    }
}

/// Outcome of reading the IFD1 thumbnail for one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ThumbnailStatus {
    /// No IFD1, or its thumbnail tags are missing
    Absent,

    /// Thumbnail bytes lie inside the payload
    Present { size: usize },

    /// Thumbnail tags are present but do not reference readable bytes
    Invalid { error: String },
}

impl ThumbnailStatus {
    pub fn from_result(result: Result<Option<Bytes>, ExifError>) -> Self {
        match result {
            Ok(Some(thumbnail)) => ThumbnailStatus::Present {
                size: thumbnail.len(),
            },
            Ok(None) => ThumbnailStatus::Absent,
            Err(err) => ThumbnailStatus::Invalid {
                error: err.to_string(),
            },
        }
    }
}

/// Full report for one successfully decoded file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub path: String,

    /// File size in bytes
    pub size: u64,

    /// Hex SHA-256 of the whole file, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,

    pub container: Container,

    /// `II` or `MM`
    pub byte_order: &'static str,

    pub directories: Vec<DirectoryReport>,

    pub gps: GpsStatus,

    pub thumbnail: ThumbnailStatus,
}

impl FileReport {
    /// Build a report from a decoded model and the raw file bytes.
    pub fn new(path: impl Into<String>, file: &[u8], model: &MetadataModel, digest: bool) -> Self {
        Self {
            path: path.into(),
            size: file.len() as u64,
            sha256: digest.then(|| sha256_hex(file)),
            container: model.container(),
            byte_order: model.byte_order().marker(),
            directories: model.directories().map(DirectoryReport::new).collect(),
            gps: GpsStatus::from_result(model.gps_coordinate()),
            thumbnail: ThumbnailStatus::from_result(model.thumbnail()),
        }
    }

    /// Total number of decoded tags across all directories.
    pub fn entry_count(&self) -> usize {
        self.directories.iter().map(|d| d.entries.len()).sum()
    }
}

/// Hex-encoded SHA-256 digest.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

// =============================================================================
// JSON Output
// =============================================================================

/// Serializable form of one file outcome, success or failure.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReportItem<'a> {
    Report(&'a FileReport),
    Failure { path: &'a str, error: String },
}

impl<'a> From<&'a FileOutcome> for ReportItem<'a> {
    fn from(outcome: &'a FileOutcome) -> Self {
        match &outcome.result {
            Ok(report) => ReportItem::Report(report),
            Err(err) => ReportItem::Failure {
                path: &outcome.path,
                error: err.to_string(),
            },
        }
    }
}

/// GPS-only view of one file outcome.
#[derive(Debug, Clone, Serialize)]
pub struct GpsItem<'a> {
    pub path: &'a str,
    #[serde(flatten)]
    pub gps: GpsStatus,
}

impl<'a> From<&'a FileOutcome> for GpsItem<'a> {
    fn from(outcome: &'a FileOutcome) -> Self {
        let gps = match &outcome.result {
            Ok(report) => report.gps.clone(),
            Err(err) => GpsStatus::Invalid {
                error: err.to_string(),
            },
        };
        GpsItem {
            path: &outcome.path,
            gps,
        }
    }
}

// =============================================================================
// Text Output
// =============================================================================

/// Render a report as human-readable text.
pub fn render_text(report: &FileReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", report.path);
    let _ = writeln!(
        out,
        "  {} bytes, {}, byte order {}",
        report.size,
        report.container.name(),
        report.byte_order
    );
    if let Some(ref sha256) = report.sha256 {
        let _ = writeln!(out, "  sha256 {}", sha256);
    }

    for directory in &report.directories {
        let _ = writeln!(
            out,
            "  [{}] offset {}, {} entries",
            directory.name,
            directory.offset,
            directory.entries.len()
        );
        for entry in &directory.entries {
            let _ = writeln!(
                out,
                "    {:<28} {:<9} {:>5}  {}",
                entry.label(),
                entry.field_type,
                entry.count,
                entry.value
            );
        }
    }

    let _ = writeln!(out, "  GPS: {}", render_gps(&report.gps));
    match &report.thumbnail {
        ThumbnailStatus::Absent => {}
        ThumbnailStatus::Present { size } => {
            let _ = writeln!(out, "  Thumbnail: {} bytes", size);
        }
        ThumbnailStatus::Invalid { error } => {
            let _ = writeln!(out, "  Thumbnail: invalid ({})", error);
        }
    }

    out
}

/// Render a GPS status on one line.
pub fn render_gps(gps: &GpsStatus) -> String {
    match gps {
        GpsStatus::Absent => "none".to_string(),
        GpsStatus::Present(coordinate) => {
            let mut line = format!("{:.6}, {:.6}", coordinate.latitude, coordinate.longitude);
            if let Some(altitude) = coordinate.altitude {
                let _ = write!(line, " ({:.1} m)", altitude);
            }
            line
        }
        GpsStatus::Invalid { error } => format!("invalid ({})", error),
    }
}

// =============================================================================
// Tests
// =============================================================================
