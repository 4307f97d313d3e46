//! TIFF structure decoding for Exif payloads.
//!
//! An Exif payload is a classic TIFF structure: an 8-byte header followed by
//! a graph of tag directories (IFDs). This module decodes that graph from an
//! in-memory buffer without copying it.
//!
//! # Key Concepts
//!
//! - **Byte order**: the header declares its endianness (II = little-endian,
//!   MM = big-endian). All multi-byte values must be read respecting it.
//!
//! - **Directory (IFD)**: a 16-bit entry count, a table of 12-byte entries and
//!   a 32-bit offset to the next directory in the chain (0 ends the chain).
//!
//! - **Inline vs offset values**: values of 4 bytes or less are stored in the
//!   entry itself; larger values live elsewhere and the entry holds their
//!   offset from the start of the TIFF header.
//!
//! - **Sub-directories**: IFD0 points to the Exif and GPS directories, which
//!   in turn may point to the Interoperability directory and a MakerNote.
//!   See [`SubdirectoryResolver`] for the cycle rule applied while following
//!   these pointers.

mod directory;
mod parser;
mod reader;
mod resolver;
mod tags;
mod values;

pub use directory::{Directory, DirectoryParser, TagEntry, ENTRY_SIZE};
pub use parser::{ByteOrder, TiffHeader, TIFF_HEADER_SIZE};
pub use reader::ByteReader;
pub use resolver::{DirectoryTree, SubdirectoryResolver};
pub use tags::{tag_name, DirectoryKind, ExifTag, FieldType, GpsTag, InteropTag};
pub use values::{decode_value, BlobRef, Rational, SRational, TagValue, BLOB_THRESHOLD};
