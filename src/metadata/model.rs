//! The decoded metadata of one image.
//!
//! [`MetadataModel::parse`] is the single entry point of the decoder: it
//! locates the TIFF structure in the input buffer, decodes the header and the
//! full directory tree, and returns an immutable model. Derived values such
//! as the GPS position are computed on demand and never cached, so a broken
//! GPS directory does not prevent reading the camera tags.

use std::ops::Range;

use bytes::Bytes;
use tracing::debug;

use crate::error::ExifError;
use crate::format::locate_tiff;
use crate::format::tiff::{
    BlobRef, ByteOrder, ByteReader, Directory, DirectoryKind, DirectoryParser, DirectoryTree,
    ExifTag, GpsTag, Rational, SubdirectoryResolver, TagEntry, TagValue, TiffHeader,
};
use crate::format::Container;

use super::gps::{self, GpsCoordinate};

// =============================================================================
// MetadataModel
// =============================================================================

/// Immutable view over the Exif metadata of one buffer.
///
/// The model keeps a reference-counted slice of the caller's buffer covering
/// the TIFF structure, so large opaque values can be handed out later
/// without copying.
#[derive(Debug, Clone)]
pub struct MetadataModel {
    data: Bytes,
    container: Container,
    header: TiffHeader,
    tree: DirectoryTree,
}

impl MetadataModel {
    /// Decode all metadata from a JPEG, Exif APP1 payload or TIFF buffer.
    ///
    /// # Errors
    /// Any structural failure of the container, header or reachable
    /// directories. Errors in individual derived values (such as GPS) are
    /// reported by their accessors instead.
    pub fn parse(buffer: impl Into<Bytes>) -> Result<Self, ExifError> {
        let buffer = buffer.into();
        let (container, range) = locate_tiff(&buffer)?;
        let data = buffer.slice(range);

        let header = TiffHeader::parse(&data)?;
        let reader = ByteReader::new(&data, header.byte_order);
        let tree = SubdirectoryResolver::new(DirectoryParser::new(reader))
            .resolve(header.first_ifd_offset)?;

        debug!(
            container = container.name(),
            byte_order = header.byte_order.marker(),
            directories = tree.len(),
            "decoded metadata"
        );

        Ok(Self {
            data,
            container,
            header,
            tree,
        })
    }

    // -------------------------------------------------------------------------
    // Structure
    // -------------------------------------------------------------------------

    pub fn container(&self) -> Container {
        self.container
    }

    pub fn header(&self) -> &TiffHeader {
        &self.header
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.header.byte_order
    }

    /// The TIFF structure all offsets are relative to.
    pub fn payload(&self) -> &Bytes {
        &self.data
    }

    pub fn directory(&self, kind: DirectoryKind) -> Option<&Directory> {
        self.tree.get(kind)
    }

    /// All decoded directories, IFD0 first.
    pub fn directories(&self) -> impl Iterator<Item = &Directory> {
        self.tree.iter()
    }

    pub fn entry(&self, kind: DirectoryKind, tag_id: u16) -> Option<&TagEntry> {
        self.tree.get(kind)?.get(tag_id)
    }

    /// Look up a decoded tag value.
    ///
    /// Returns `None` when the directory or the tag is absent.
    pub fn get_tag(&self, kind: DirectoryKind, tag_id: u16) -> Option<&TagValue> {
        self.entry(kind, tag_id).map(|entry| &entry.value)
    }

    /// Text of an `ASCII` tag, `None` if absent or of another type.
    pub fn ascii(&self, kind: DirectoryKind, tag_id: u16) -> Option<&str> {
        self.get_tag(kind, tag_id)?.as_ascii()
    }

    // -------------------------------------------------------------------------
    // Common tags
    // -------------------------------------------------------------------------

    pub fn make(&self) -> Option<&str> {
        self.ascii(DirectoryKind::Primary, ExifTag::Make.as_u16())
    }

    pub fn model(&self) -> Option<&str> {
        self.ascii(DirectoryKind::Primary, ExifTag::Model.as_u16())
    }

    pub fn date_time_original(&self) -> Option<&str> {
        self.ascii(DirectoryKind::Exif, ExifTag::DateTimeOriginal.as_u16())
    }

    pub fn orientation(&self) -> Option<u16> {
        let value = self
            .get_tag(DirectoryKind::Primary, ExifTag::Orientation.as_u16())?
            .as_u32()?;
        u16::try_from(value).ok()
    }

    // -------------------------------------------------------------------------
    // Byte access
    // -------------------------------------------------------------------------

    /// Slice of the payload for `offset..offset+len`, bounds-checked.
    fn slice(&self, offset: u64, len: u64) -> Result<Bytes, ExifError> {
        let reader = ByteReader::new(&self.data, self.header.byte_order);
        reader.read_bytes(offset, len)?;
        // read_bytes verified both bounds against data.len()
        let range: Range<usize> = offset as usize..(offset + len) as usize;
        Ok(self.data.slice(range))
    }

    /// Bytes of a value that was kept by reference, without copying.
    pub fn materialize(&self, blob: &BlobRef) -> Result<Bytes, ExifError> {
        self.slice(blob.offset as u64, blob.len as u64)
    }

    /// Raw bytes of an entry's value as stored in the payload.
    pub fn raw_bytes(&self, entry: &TagEntry) -> Result<Bytes, ExifError> {
        self.slice(entry.data_offset(), entry.byte_len())
    }

    /// Embedded JPEG thumbnail referenced from IFD1.
    ///
    /// Returns `None` when IFD1 or either of its thumbnail tags is absent.
    ///
    /// # Errors
    /// - `InvalidTagValue` if a thumbnail tag is not a single integer
    /// - `OutOfBounds` if the thumbnail extends past the payload
    pub fn thumbnail(&self) -> Result<Option<Bytes>, ExifError> {
        let Some(ifd1) = self.tree.get(DirectoryKind::Thumbnail) else {
            return Ok(None);
        };
        let (Some(offset), Some(length)) = (
            ifd1.get(ExifTag::JpegInterchangeFormat.as_u16()),
            ifd1.get(ExifTag::JpegInterchangeFormatLength.as_u16()),
        ) else {
            return Ok(None);
        };

        let offset = single_integer(offset, ExifTag::JpegInterchangeFormat.name())?;
        let length = single_integer(length, ExifTag::JpegInterchangeFormatLength.name())?;
        self.slice(offset as u64, length as u64).map(Some)
    }

    // -------------------------------------------------------------------------
    // GPS
    // -------------------------------------------------------------------------

    /// Compute the GPS position from the GPS directory.
    ///
    /// Returns `None` when the GPS directory or any of the latitude and
    /// longitude tags (value and reference) is absent. Altitude is included
    /// only when both `GPSAltitude` and `GPSAltitudeRef` are present.
    ///
    /// # Errors
    /// - `InvalidTagValue` if a GPS tag has the wrong type or count
    /// - `InvalidReference` for an unknown hemisphere or altitude reference
    /// - `DivisionByZero` for a zero denominator
    pub fn gps_coordinate(&self) -> Result<Option<GpsCoordinate>, ExifError> {
        let Some(gps_ifd) = self.tree.get(DirectoryKind::Gps) else {
            return Ok(None);
        };

        let find = |tag: GpsTag| gps_ifd.get(tag.as_u16());
        let (Some(lat_ref), Some(lat), Some(lon_ref), Some(lon)) = (
            find(GpsTag::LatitudeRef),
            find(GpsTag::Latitude),
            find(GpsTag::LongitudeRef),
            find(GpsTag::Longitude),
        ) else {
            return Ok(None);
        };

        let latitude = gps::compute(
            degrees_minutes_seconds(lat, GpsTag::Latitude)?,
            hemisphere(lat_ref, GpsTag::LatitudeRef)?,
        )?;
        let longitude = gps::compute(
            degrees_minutes_seconds(lon, GpsTag::Longitude)?,
            hemisphere(lon_ref, GpsTag::LongitudeRef)?,
        )?;

        let altitude = match (find(GpsTag::AltitudeRef), find(GpsTag::Altitude)) {
            (Some(reference), Some(value)) => {
                let reference = single_integer(reference, GpsTag::AltitudeRef.name())?;
                let reference = u8::try_from(reference)
                    .map_err(|_| ExifError::InvalidReference(reference.to_string()))?;
                Some(gps::altitude(single_rational(value, GpsTag::Altitude)?, reference)?)
            }
            _ => None,
        };

        Ok(Some(GpsCoordinate {
            latitude,
            longitude,
            altitude,
        }))
    }
}

// =============================================================================
// Tag Value Extraction
// =============================================================================

fn invalid(entry: &TagEntry, tag: &'static str, expected: &str) -> ExifError {
    ExifError::InvalidTagValue {
        tag,
        message: format!(
            "expected {}, found {} x{}",
            expected,
            entry.field_type.name(),
            entry.count
        ),
    }
}

fn single_integer(entry: &TagEntry, tag: &'static str) -> Result<u32, ExifError> {
    entry
        .value
        .as_u32()
        .ok_or_else(|| invalid(entry, tag, "a single integer"))
}

fn single_rational(entry: &TagEntry, tag: GpsTag) -> Result<Rational, ExifError> {
    match entry.value.as_rationals() {
        Some([value]) => Ok(*value),
        _ => Err(invalid(entry, tag.name(), "1 RATIONAL")),
    }
}

fn degrees_minutes_seconds(entry: &TagEntry, tag: GpsTag) -> Result<&[Rational; 3], ExifError> {
    entry
        .value
        .as_rationals()
        .and_then(|values| <&[Rational; 3]>::try_from(values).ok())
        .ok_or_else(|| invalid(entry, tag.name(), "3 RATIONAL"))
}

/// Hemisphere letter of a `GPSLatitudeRef` / `GPSLongitudeRef` tag.
fn hemisphere(entry: &TagEntry, tag: GpsTag) -> Result<char, ExifError> {
    let text = entry
        .value
        .as_ascii()
        .ok_or_else(|| invalid(entry, tag.name(), "ASCII"))?;

    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(reference), None) => Ok(reference),
        _ => Err(ExifError::InvalidReference(text.to_string())),
    }
}

// =============================================================================
// Tests
// =============================================================================
