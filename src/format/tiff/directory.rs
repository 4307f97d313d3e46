//! Tag directory (IFD) decoding.
//!
//! # Directory Layout
//!
//! ```text
//! Bytes 0-1:          Entry count N
//! Bytes 2..2+12N:     N entries of 12 bytes each
//!                       0-1  tag id
//!                       2-3  field type
//!                       4-7  value count
//!                       8-11 value (if it fits in 4 bytes) or offset to it
//! Bytes 2+12N..+4:    Offset of the next chained directory (0 = none)
//! ```

use tracing::trace;

use crate::error::ExifError;

use super::reader::ByteReader;
use super::tags::{DirectoryKind, FieldType};
use super::values::{decode_value, BlobRef, TagValue, BLOB_THRESHOLD};

/// Size of one directory entry in bytes.
pub const ENTRY_SIZE: u64 = 12;

/// Size of the entry-count field.
const COUNT_SIZE: u64 = 2;

/// Size of the next-directory offset field.
const NEXT_OFFSET_SIZE: u64 = 4;

// =============================================================================
// TagEntry
// =============================================================================

/// A single decoded directory entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TagEntry {
    /// Tag identifier
    pub tag_id: u16,

    /// Declared field type
    pub field_type: FieldType,

    /// Number of values of `field_type`
    pub count: u32,

    /// The raw 4-byte value/offset field, read in the payload's byte order
    pub value_offset: u32,

    /// Whether the value lives in the 4-byte field itself
    pub is_inline: bool,

    /// Offset of this entry within the payload
    pub entry_offset: u32,

    /// Decoded value
    pub value: TagValue,
}

impl TagEntry {
    /// Offset of the bytes backing the value.
    ///
    /// For inline values this is the position of the value field inside
    /// the entry itself.
    pub fn data_offset(&self) -> u64 {
        if self.is_inline {
            self.entry_offset as u64 + 8
        } else {
            self.value_offset as u64
        }
    }

    /// Byte length of the value (`type_size * count`).
    pub fn byte_len(&self) -> u64 {
        self.field_type.byte_len(self.count)
    }

    /// Borrow the raw bytes backing this entry's value.
    pub fn raw_bytes<'a>(&self, reader: &ByteReader<'a>) -> Result<&'a [u8], ExifError> {
        reader.read_bytes(self.data_offset(), self.byte_len())
    }
}

// =============================================================================
// Directory
// =============================================================================

/// A decoded tag directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Directory {
    /// Which directory this is
    pub kind: DirectoryKind,

    /// Offset of the directory within the payload
    pub offset: u32,

    /// Entries in on-disk order, unknown tags included
    pub entries: Vec<TagEntry>,

    /// Offset of the next chained directory, if any
    pub next_offset: Option<u32>,
}

impl Directory {
    /// First entry with the given tag id.
    pub fn get(&self, tag_id: u16) -> Option<&TagEntry> {
        self.entries.iter().find(|e| e.tag_id == tag_id)
    }

    /// Decoded value of the first entry with the given tag id.
    pub fn value(&self, tag_id: u16) -> Option<&TagValue> {
        self.get(tag_id).map(|e| &e.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagEntry> {
        self.entries.iter()
    }

    /// Total on-disk size of the entry table including count and next offset.
    pub fn table_size(entry_count: u16) -> u64 {
        COUNT_SIZE + entry_count as u64 * ENTRY_SIZE + NEXT_OFFSET_SIZE
    }
}

// =============================================================================
// DirectoryParser
// =============================================================================

/// Decodes tag directories from a TIFF payload.
#[derive(Debug, Clone, Copy)]
pub struct DirectoryParser<'a> {
    reader: ByteReader<'a>,
}

impl<'a> DirectoryParser<'a> {
    pub fn new(reader: ByteReader<'a>) -> Self {
        Self { reader }
    }

    pub fn reader(&self) -> &ByteReader<'a> {
        &self.reader
    }

    /// Decode the directory starting at `offset`.
    ///
    /// # Errors
    /// - `MalformedDirectory` if the entry table or next-offset field runs
    ///   past the end of the buffer, or an entry declares an unknown type
    /// - `OutOfBounds` if an offset-addressed value runs past the end
    pub fn parse(&self, offset: u32, kind: DirectoryKind) -> Result<Directory, ExifError> {
        let start = offset as u64;

        let entry_count = self.reader.read_u16(start).map_err(|_| {
            ExifError::malformed(offset, "entry count lies past the end of the buffer")
        })?;

        let table_end = start + Directory::table_size(entry_count);
        if table_end > self.reader.len() as u64 {
            return Err(ExifError::malformed(
                offset,
                format!(
                    "{} entries need {} bytes, buffer ends at {}",
                    entry_count,
                    table_end - start,
                    self.reader.len()
                ),
            ));
        }

        let mut entries = Vec::with_capacity(entry_count as usize);
        for index in 0..entry_count as u64 {
            let entry_offset = start + COUNT_SIZE + index * ENTRY_SIZE;
            entries.push(self.parse_entry(entry_offset, offset)?);
        }

        let next = self.reader.read_u32(table_end - NEXT_OFFSET_SIZE)?;
        let next_offset = (next != 0).then_some(next);

        trace!(
            kind = kind.name(),
            offset,
            entries = entries.len(),
            next = ?next_offset,
            "parsed directory"
        );

        Ok(Directory {
            kind,
            offset,
            entries,
            next_offset,
        })
    }

    /// Decode one 12-byte entry. The caller has verified the entry table fits.
    fn parse_entry(&self, entry_offset: u64, directory_offset: u32) -> Result<TagEntry, ExifError> {
        let reader = &self.reader;

        let tag_id = reader.read_u16(entry_offset)?;
        let type_raw = reader.read_u16(entry_offset + 2)?;
        let count = reader.read_u32(entry_offset + 4)?;
        let value_offset = reader.read_u32(entry_offset + 8)?;

        let field_type = FieldType::from_u16(type_raw).ok_or_else(|| {
            ExifError::malformed(
                directory_offset,
                format!("tag 0x{:04X} has unknown field type {}", tag_id, type_raw),
            )
        })?;

        let byte_len = field_type.byte_len(count);
        let is_inline = field_type.fits_inline(count);

        let value = if is_inline {
            let bytes = reader.read_bytes(entry_offset + 8, byte_len)?;
            decode_value(field_type, count, bytes, reader.byte_order())?
        } else {
            let bytes = reader.read_bytes(value_offset as u64, byte_len)?;
            if is_opaque(field_type) && byte_len > BLOB_THRESHOLD {
                TagValue::Blob(BlobRef {
                    field_type,
                    offset: value_offset,
                    len: bytes.len() as u32,
                })
            } else {
                decode_value(field_type, count, bytes, reader.byte_order())?
            }
        };

        Ok(TagEntry {
            tag_id,
            field_type,
            count,
            value_offset,
            is_inline,
            entry_offset: entry_offset as u32,
            value,
        })
    }
}

fn is_opaque(field_type: FieldType) -> bool {
    matches!(field_type, FieldType::Byte | FieldType::Undefined)
}

// =============================================================================
// Tests
// =============================================================================
