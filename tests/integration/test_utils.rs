//! Test utilities for integration tests.
//!
//! This module provides a small TIFF/Exif encoder used to build payloads with
//! known contents, plus helpers that wrap a payload in a JPEG file or an Exif
//! APP1 identifier.

use std::io::Write;

// =============================================================================
// Field Values
// =============================================================================

/// Value of one tag written by [`ExifBuilder`].
#[derive(Debug, Clone)]
pub enum Field {
    Byte(Vec<u8>),
    /// Written with a trailing NUL
    Ascii(String),
    Short(Vec<u16>),
    Long(Vec<u32>),
    Rational(Vec<(u32, u32)>),
    Undefined(Vec<u8>),
    SRational(Vec<(i32, i32)>),
    /// Arbitrary type code, count and value bytes
    Raw {
        field_type: u16,
        count: u32,
        bytes: Vec<u8>,
    },
}

impl Field {
    pub fn ascii(text: &str) -> Self {
        Field::Ascii(text.to_string())
    }

    /// Encode as (type code, count, value bytes).
    fn encode(&self, order: Endian) -> (u16, u32, Vec<u8>) {
        match self {
            Field::Byte(v) => (1, v.len() as u32, v.clone()),
            Field::Ascii(s) => {
                let mut bytes = s.as_bytes().to_vec();
                bytes.push(0);
                (2, bytes.len() as u32, bytes)
            }
            Field::Short(v) => (
                3,
                v.len() as u32,
                v.iter().flat_map(|x| order.u16(*x)).collect(),
            ),
            Field::Long(v) => (
                4,
                v.len() as u32,
                v.iter().flat_map(|x| order.u32(*x)).collect(),
            ),
            Field::Rational(v) => (
                5,
                v.len() as u32,
                v.iter()
                    .flat_map(|(n, d)| order.u32(*n).into_iter().chain(order.u32(*d)))
                    .collect(),
            ),
            Field::Undefined(v) => (7, v.len() as u32, v.clone()),
            Field::SRational(v) => (
                10,
                v.len() as u32,
                v.iter()
                    .flat_map(|(n, d)| order.u32(*n as u32).into_iter().chain(order.u32(*d as u32)))
                    .collect(),
            ),
            Field::Raw {
                field_type,
                count,
                bytes,
            } => (*field_type, *count, bytes.clone()),
        }
    }
}

// =============================================================================
// Byte Order
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    pub fn u16(self, value: u16) -> [u8; 2] {
        match self {
            Endian::Little => value.to_le_bytes(),
            Endian::Big => value.to_be_bytes(),
        }
    }

    pub fn u32(self, value: u32) -> [u8; 4] {
        match self {
            Endian::Little => value.to_le_bytes(),
            Endian::Big => value.to_be_bytes(),
        }
    }

    fn marker(self) -> &'static [u8; 2] {
        match self {
            Endian::Little => b"II",
            Endian::Big => b"MM",
        }
    }
}

// =============================================================================
// ExifBuilder
// =============================================================================

type Entries = Vec<(u16, Field)>;

/// Builds a TIFF payload with IFD0 and optional Exif, Interoperability, GPS
/// and IFD1 directories.
///
/// Directories are laid out in that order after the header, each followed by
/// its out-of-line values. Pointer tags (Exif, GPS, Interoperability) and
/// the IFD1 thumbnail tags are added automatically.
#[derive(Debug, Clone)]
pub struct ExifBuilder {
    order: Endian,
    ifd0: Entries,
    exif: Option<Entries>,
    interop: Option<Entries>,
    gps: Option<Entries>,
    ifd1: Option<Entries>,
    thumbnail: Option<Vec<u8>>,
}

impl ExifBuilder {
    pub fn new(order: Endian) -> Self {
        Self {
            order,
            ifd0: Vec::new(),
            exif: None,
            interop: None,
            gps: None,
            ifd1: None,
            thumbnail: None,
        }
    }

    pub fn little_endian() -> Self {
        Self::new(Endian::Little)
    }

    pub fn big_endian() -> Self {
        Self::new(Endian::Big)
    }

    pub fn ifd0(mut self, tag: u16, field: Field) -> Self {
        self.ifd0.push((tag, field));
        self
    }

    pub fn exif(mut self, tag: u16, field: Field) -> Self {
        self.exif.get_or_insert_with(Vec::new).push((tag, field));
        self
    }

    pub fn interop(mut self, tag: u16, field: Field) -> Self {
        self.interop.get_or_insert_with(Vec::new).push((tag, field));
        self
    }

    pub fn gps(mut self, tag: u16, field: Field) -> Self {
        self.gps.get_or_insert_with(Vec::new).push((tag, field));
        self
    }

    /// Add a complete latitude/longitude pair to the GPS directory.
    pub fn gps_position(
        self,
        lat_ref: &str,
        lat: [(u32, u32); 3],
        lon_ref: &str,
        lon: [(u32, u32); 3],
    ) -> Self {
        self.gps(0x0001, Field::ascii(lat_ref))
            .gps(0x0002, Field::Rational(lat.to_vec()))
            .gps(0x0003, Field::ascii(lon_ref))
            .gps(0x0004, Field::Rational(lon.to_vec()))
    }

    pub fn ifd1(mut self, tag: u16, field: Field) -> Self {
        self.ifd1.get_or_insert_with(Vec::new).push((tag, field));
        self
    }

    /// Attach a JPEG thumbnail referenced from IFD1.
    pub fn thumbnail(mut self, data: &[u8]) -> Self {
        self.ifd1.get_or_insert_with(Vec::new);
        self.thumbnail = Some(data.to_vec());
        self
    }

    /// Encode the payload.
    pub fn build(&self) -> Vec<u8> {
        // Add pointer entries with placeholder values so sizes are known
        let mut ifd0 = self.ifd0.clone();
        let mut exif = self.exif.clone();
        let mut ifd1 = self.ifd1.clone();

        if exif.is_some() {
            ifd0.push((0x8769, Field::Long(vec![0])));
        }
        if self.gps.is_some() {
            ifd0.push((0x8825, Field::Long(vec![0])));
        }
        if self.interop.is_some() {
            exif.get_or_insert_with(Vec::new)
                .push((0xA005, Field::Long(vec![0])));
        }
        if self.thumbnail.is_some() {
            if let Some(ifd1) = ifd1.as_mut() {
                ifd1.push((0x0201, Field::Long(vec![0])));
                ifd1.push((0x0202, Field::Long(vec![0])));
            }
        }

        // Assign offsets
        let ifd0_offset = 8u32;
        let mut cursor = ifd0_offset + self.directory_size(&ifd0);
        let mut place = |entries: &Option<Entries>| {
            entries.as_ref().map(|entries| {
                let offset = cursor;
                cursor += self.directory_size(entries);
                offset
            })
        };
        let exif_offset = place(&exif);
        let interop_offset = place(&self.interop);
        let gps_offset = place(&self.gps);
        let ifd1_offset = place(&ifd1);
        let thumbnail_offset = cursor;

        // Fill in pointer values
        set_long(&mut ifd0, 0x8769, exif_offset);
        set_long(&mut ifd0, 0x8825, gps_offset);
        if let Some(exif) = exif.as_mut() {
            set_long(exif, 0xA005, interop_offset);
        }
        if let (Some(ifd1), Some(thumbnail)) = (ifd1.as_mut(), self.thumbnail.as_ref()) {
            set_long(ifd1, 0x0201, Some(thumbnail_offset));
            set_long(ifd1, 0x0202, Some(thumbnail.len() as u32));
        }

        // Write
        let mut out = Vec::new();
        out.extend_from_slice(self.order.marker());
        out.extend_from_slice(&self.order.u16(42));
        out.extend_from_slice(&self.order.u32(ifd0_offset));

        self.write_directory(&mut out, &ifd0, ifd1_offset.unwrap_or(0));
        for entries in [&exif, &self.interop, &self.gps, &ifd1].into_iter().flatten() {
            self.write_directory(&mut out, entries, 0);
        }
        if let Some(thumbnail) = &self.thumbnail {
            out.extend_from_slice(thumbnail);
        }

        out
    }

    fn directory_size(&self, entries: &Entries) -> u32 {
        let data: usize = entries
            .iter()
            .map(|(_, field)| {
                let (_, _, bytes) = field.encode(self.order);
                if bytes.len() > 4 {
                    bytes.len() + bytes.len() % 2
                } else {
                    0
                }
            })
            .sum();
        (2 + 12 * entries.len() + 4 + data) as u32
    }

    fn write_directory(&self, out: &mut Vec<u8>, entries: &Entries, next: u32) {
        let base = out.len();
        let data_start = base + 2 + 12 * entries.len() + 4;
        let mut data = Vec::new();

        out.extend_from_slice(&self.order.u16(entries.len() as u16));
        for (tag, field) in entries {
            let (field_type, count, mut bytes) = field.encode(self.order);
            out.extend_from_slice(&self.order.u16(*tag));
            out.extend_from_slice(&self.order.u16(field_type));
            out.extend_from_slice(&self.order.u32(count));
            if bytes.len() <= 4 {
                bytes.resize(4, 0);
                out.extend_from_slice(&bytes);
            } else {
                let offset = (data_start + data.len()) as u32;
                out.extend_from_slice(&self.order.u32(offset));
                data.extend_from_slice(&bytes);
                if data.len() % 2 == 1 {
                    data.push(0);
                }
            }
        }
        out.extend_from_slice(&self.order.u32(next));
        out.extend_from_slice(&data);
    }
}

fn set_long(entries: &mut Entries, tag: u16, value: Option<u32>) {
    if let Some(value) = value {
        if let Some((_, field)) = entries.iter_mut().find(|(t, _)| *t == tag) {
            *field = Field::Long(vec![value]);
        }
    }
}

// =============================================================================
// Containers
// =============================================================================

/// Prefix a TIFF payload with the Exif APP1 identifier.
pub fn exif_payload(tiff: &[u8]) -> Vec<u8> {
    let mut out = b"Exif\0\0".to_vec();
    out.extend_from_slice(tiff);
    out
}

/// Wrap a TIFF payload in a minimal JPEG file (SOI, APP0, APP1, DQT, SOS, EOI).
pub fn wrap_in_jpeg(tiff: &[u8]) -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8];
    push_segment(&mut out, 0xE0, b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0");
    push_segment(&mut out, 0xE1, &exif_payload(tiff));
    push_segment(&mut out, 0xDB, &[0u8; 65]);
    push_segment(&mut out, 0xDA, &[0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);
    out.extend_from_slice(&[0x12, 0x34, 0x56, 0x78]);
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

fn push_segment(out: &mut Vec<u8>, code: u8, payload: &[u8]) {
    out.extend_from_slice(&[0xFF, code]);
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(payload);
}

/// Write bytes to a temporary file.
pub fn temp_file(contents: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    file.write_all(contents).expect("write temp file");
    file
}

/// A typical camera payload: Make, Model, Orientation, resolution, Exif
/// capture details and a GPS position.
pub fn camera_payload(order: Endian) -> Vec<u8> {
    ExifBuilder::new(order)
        .ifd0(0x010F, Field::ascii("Canon"))
        .ifd0(0x0110, Field::ascii("Canon EOS 5D Mark IV"))
        .ifd0(0x0112, Field::Short(vec![1]))
        .ifd0(0x011A, Field::Rational(vec![(72, 1)]))
        .exif(0x829A, Field::Rational(vec![(1, 250)]))
        .exif(0x8827, Field::Short(vec![400]))
        .exif(0x9003, Field::ascii("2023:06:15 14:30:00"))
        .exif(0x9204, Field::SRational(vec![(-1, 3)]))
        .gps_position(
            "N",
            [(37, 1), (48, 1), (3000, 100)],
            "W",
            [(122, 1), (25, 1), (0, 1)],
        )
        .build()
}
