//! Sub-directory resolution.
//!
//! IFD0 links to the Exif and GPS directories through pointer tags, the Exif
//! directory links to the Interoperability directory, and IFD0's next-offset
//! field chains to IFD1. Offsets in a corrupt or hostile file can point
//! anywhere, including back at a directory already decoded, so every offset
//! is checked against a visited set that lives for one parse session.
//!
//! # Cycle Rule
//!
//! A pointer tag's target must be strictly greater than its parent's offset
//! and must not have been visited before. Because every accepted child lies
//! past its parent, any pointer back to an ancestor is rejected as well.
//!
//! The next-offset chain from IFD0 to IFD1 only has to be nonzero and
//! unvisited; IFD1 may legally sit before IFD0 in the file.

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::error::ExifError;

use super::directory::{Directory, DirectoryParser, TagEntry};
use super::tags::{DirectoryKind, ExifTag, FieldType};

/// Pointer tags followed during resolution: (parent, tag, child).
const SUBDIRECTORY_POINTERS: &[(DirectoryKind, ExifTag, DirectoryKind)] = &[
    (DirectoryKind::Primary, ExifTag::ExifIfdPointer, DirectoryKind::Exif),
    (DirectoryKind::Primary, ExifTag::GpsIfdPointer, DirectoryKind::Gps),
    (DirectoryKind::Primary, ExifTag::InteropIfdPointer, DirectoryKind::Interop),
    (DirectoryKind::Exif, ExifTag::InteropIfdPointer, DirectoryKind::Interop),
];

// =============================================================================
// DirectoryTree
// =============================================================================

/// All directories decoded from one payload, keyed by kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryTree {
    directories: BTreeMap<DirectoryKind, Directory>,
}

impl DirectoryTree {
    pub fn get(&self, kind: DirectoryKind) -> Option<&Directory> {
        self.directories.get(&kind)
    }

    pub fn contains(&self, kind: DirectoryKind) -> bool {
        self.directories.contains_key(&kind)
    }

    /// Directories in kind order (IFD0 first).
    pub fn iter(&self) -> impl Iterator<Item = &Directory> {
        self.directories.values()
    }

    pub fn kinds(&self) -> impl Iterator<Item = DirectoryKind> + '_ {
        self.directories.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.directories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }

    fn insert(&mut self, directory: Directory) {
        self.directories.insert(directory.kind, directory);
    }
}

// =============================================================================
// SubdirectoryResolver
// =============================================================================

/// Walks the directory graph of one payload, starting from IFD0.
pub struct SubdirectoryResolver<'a> {
    parser: DirectoryParser<'a>,
    visited: HashSet<u32>,
}

impl<'a> SubdirectoryResolver<'a> {
    pub fn new(parser: DirectoryParser<'a>) -> Self {
        Self {
            parser,
            visited: HashSet::new(),
        }
    }

    /// Decode IFD0 at `primary_offset` and everything reachable from it.
    ///
    /// # Errors
    /// Any error from decoding IFD0, the Exif/GPS/Interoperability
    /// directories or IFD1, including `CyclicDirectory` when a pointer
    /// violates the cycle rule. MakerNote failures are not errors.
    pub fn resolve(mut self, primary_offset: u32) -> Result<DirectoryTree, ExifError> {
        self.visited.insert(primary_offset);
        let primary = self
            .parser
            .parse(primary_offset, DirectoryKind::Primary)?;

        let mut tree = DirectoryTree::default();
        self.descend(&primary, &mut tree)?;

        if let Some(next) = primary.next_offset {
            let thumbnail = self.chain(&primary, next, DirectoryKind::Thumbnail)?;
            if let Some(further) = thumbnail.next_offset {
                debug!(offset = further, "not following directories chained after IFD1");
            }
            tree.insert(thumbnail);
        }

        tree.insert(primary);
        Ok(tree)
    }

    /// Resolve the pointer tags of `parent`, recursing into each child.
    fn descend(&mut self, parent: &Directory, tree: &mut DirectoryTree) -> Result<(), ExifError> {
        for &(parent_kind, tag, child_kind) in SUBDIRECTORY_POINTERS {
            if parent.kind != parent_kind || tree.contains(child_kind) {
                continue;
            }
            let Some(entry) = parent.get(tag.as_u16()) else {
                continue;
            };

            let offset = pointer_offset(parent, entry, tag)?;
            if offset == 0 {
                debug!(tag = tag.name(), "null sub-directory pointer, treating as absent");
                continue;
            }

            let child = self.follow(parent, offset, child_kind)?;
            self.descend(&child, tree)?;
            tree.insert(child);
        }

        if parent.kind == DirectoryKind::Exif {
            self.resolve_makernote(parent, tree);
        }

        Ok(())
    }

    /// Parse the MakerNote as a plain tag directory when it is laid out as one.
    ///
    /// Many vendors prefix their MakerNote with a signature or use private
    /// layouts; those are left as the raw MakerNote tag in the Exif directory.
    fn resolve_makernote(&mut self, exif: &Directory, tree: &mut DirectoryTree) {
        let Some(entry) = exif.get(ExifTag::MakerNote.as_u16()) else {
            return;
        };
        if entry.is_inline {
            return;
        }

        match self.follow(exif, entry.value_offset, DirectoryKind::Makernote) {
            Ok(makernote) => tree.insert(makernote),
            Err(err) => {
                debug!(offset = entry.value_offset, error = %err, "MakerNote is not a plain tag directory");
            }
        }
    }

    /// Parse the directory at `offset` as a child of `parent`, enforcing the cycle rule.
    fn follow(
        &mut self,
        parent: &Directory,
        offset: u32,
        kind: DirectoryKind,
    ) -> Result<Directory, ExifError> {
        if offset <= parent.offset || !self.visited.insert(offset) {
            return Err(ExifError::CyclicDirectory {
                offset: offset as u64,
            });
        }

        debug!(
            parent = parent.kind.name(),
            child = kind.name(),
            offset,
            "following sub-directory"
        );
        self.parser.parse(offset, kind)
    }

    /// Parse the directory at `offset` chained from `previous` through its
    /// next-offset field. Only revisiting an offset is rejected.
    fn chain(
        &mut self,
        previous: &Directory,
        offset: u32,
        kind: DirectoryKind,
    ) -> Result<Directory, ExifError> {
        if !self.visited.insert(offset) {
            return Err(ExifError::CyclicDirectory {
                offset: offset as u64,
            });
        }

        debug!(
            previous = previous.kind.name(),
            next = kind.name(),
            offset,
            "following directory chain"
        );
        self.parser.parse(offset, kind)
    }
}

/// Extract the target offset of a pointer tag.
///
/// Pointers must be a single `LONG` or `IFD` value.
fn pointer_offset(parent: &Directory, entry: &TagEntry, tag: ExifTag) -> Result<u32, ExifError> {
    let valid_type = matches!(entry.field_type, FieldType::Long | FieldType::Ifd);
    match entry.value.as_u32() {
        Some(offset) if valid_type => Ok(offset),
        _ => Err(ExifError::malformed(
            parent.offset,
            format!(
                "{} must be a single LONG, found {} x{}",
                tag.name(),
                entry.field_type.name(),
                entry.count
            ),
        )),
    }
}

// =============================================================================
// Tests
// =============================================================================
