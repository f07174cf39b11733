//! # Grouped Tile Formats
//!
//! Two encodings of a grouped layer:
//!
//! - **JSON**: a list of records using tile names (`"Grass"`, `"Desert"`, ...)
//! - **Archive**: a 16-byte header followed by 16-byte records, LZ4
//!   compressed with the uncompressed size prepended
//!
//! ## Archive Layout
//!
//! ```text
//! header:  magic "ISLG" | version u16 | width u16 | height u16 | reserved u16 | count u32
//! record:  column u16 | row u16 | width u16 | height u16 | kind u8 | up u8 | right u8 | down u8 | left u8 | reserved [u8; 3]
//! ```
//!
//! Integers are stored in native byte order.

use std::path::Path;

use bytemuck::{Pod, Zeroable};
use isleforge_core::{Rect, TileKind};
use isleforge_procedural::grouping::{render, GroupedTile};
use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{StorageError, StorageResult};

/// One grouped rectangle as written to JSON.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedTileRecord {
    /// Kind name.
    pub tile_type: TileKind,
    /// Left column.
    pub column: usize,
    /// Top row.
    pub row: usize,
    /// Width in cells.
    pub width: usize,
    /// Height in cells.
    pub height: usize,
    /// Neighbor kind above.
    pub tile_up_type: TileKind,
    /// Neighbor kind to the right.
    pub tile_right_type: TileKind,
    /// Neighbor kind below.
    pub tile_down_type: TileKind,
    /// Neighbor kind to the left.
    pub tile_left_type: TileKind,
}

impl From<GroupedTile> for GroupedTileRecord {
    fn from(g: GroupedTile) -> Self {
        Self {
            tile_type: g.kind,
            column: g.column,
            row: g.row,
            width: g.width,
            height: g.height,
            tile_up_type: g.up,
            tile_right_type: g.right,
            tile_down_type: g.down,
            tile_left_type: g.left,
        }
    }
}

impl From<GroupedTileRecord> for GroupedTile {
    fn from(r: GroupedTileRecord) -> Self {
        Self {
            kind: r.tile_type,
            column: r.column,
            row: r.row,
            width: r.width,
            height: r.height,
            up: r.tile_up_type,
            right: r.tile_right_type,
            down: r.tile_down_type,
            left: r.tile_left_type,
        }
    }
}

/// Serializes groups as a pretty-printed JSON list.
///
/// # Errors
///
/// Returns `StorageError::Json` if serialization fails.
pub fn to_json(groups: &[GroupedTile]) -> StorageResult<String> {
    let records: Vec<GroupedTileRecord> = groups.iter().copied().map(Into::into).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Parses a JSON list of grouped records.
///
/// # Errors
///
/// Returns `StorageError::Json` if the list is malformed or names an
/// unknown kind.
pub fn from_json(source: &str) -> StorageResult<Vec<GroupedTile>> {
    let records: Vec<GroupedTileRecord> = serde_json::from_str(source)?;
    Ok(records.into_iter().map(Into::into).collect())
}

/// Writes groups to a JSON file.
///
/// # Errors
///
/// Returns `StorageError::Io` if the file cannot be written.
pub fn save_json(path: impl AsRef<Path>, groups: &[GroupedTile]) -> StorageResult<()> {
    std::fs::write(path, to_json(groups)?)?;
    Ok(())
}

/// Reads groups from a JSON file.
///
/// # Errors
///
/// Returns `StorageError::Io` if the file cannot be read, otherwise as
/// [`from_json`].
pub fn load_json(path: impl AsRef<Path>) -> StorageResult<Vec<GroupedTile>> {
    from_json(&std::fs::read_to_string(path)?)
}

/// Archive magic bytes.
pub const ARCHIVE_MAGIC: [u8; 4] = *b"ISLG";

/// Current archive version.
pub const ARCHIVE_VERSION: u16 = 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
struct ArchiveHeader {
    magic: [u8; 4],
    version: u16,
    width: u16,
    height: u16,
    reserved: u16,
    count: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
struct GroupRecord {
    column: u16,
    row: u16,
    width: u16,
    height: u16,
    kind: u8,
    up: u8,
    right: u8,
    down: u8,
    left: u8,
    reserved: [u8; 3],
}

const HEADER_SIZE: usize = std::mem::size_of::<ArchiveHeader>();
const RECORD_SIZE: usize = std::mem::size_of::<GroupRecord>();

/// A grouped layer together with the grid size it covers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupedArchive {
    /// Grid width.
    pub width: usize,
    /// Grid height.
    pub height: usize,
    /// Groups in scan order.
    pub groups: Vec<GroupedTile>,
}

impl GroupedArchive {
    /// Encodes and compresses the archive.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidArchive` if a dimension or coordinate
    /// does not fit in 16 bits, or the group count in 32 bits.
    pub fn encode(&self) -> StorageResult<Vec<u8>> {
        let header = ArchiveHeader {
            magic: ARCHIVE_MAGIC,
            version: ARCHIVE_VERSION,
            width: narrow(self.width, "width")?,
            height: narrow(self.height, "height")?,
            reserved: 0,
            count: u32::try_from(self.groups.len())
                .map_err(|_| StorageError::InvalidArchive("too many groups".into()))?,
        };

        let mut bytes = Vec::with_capacity(HEADER_SIZE + self.groups.len() * RECORD_SIZE);
        bytes.extend_from_slice(bytemuck::bytes_of(&header));
        for g in &self.groups {
            let record = GroupRecord {
                column: narrow(g.column, "column")?,
                row: narrow(g.row, "row")?,
                width: narrow(g.width, "group width")?,
                height: narrow(g.height, "group height")?,
                kind: g.kind as u8,
                up: g.up as u8,
                right: g.right as u8,
                down: g.down as u8,
                left: g.left as u8,
                reserved: [0; 3],
            };
            bytes.extend_from_slice(bytemuck::bytes_of(&record));
        }

        let compressed = compress_prepend_size(&bytes);
        debug!(
            groups = self.groups.len(),
            raw = bytes.len(),
            compressed = compressed.len(),
            "Grouped archive encoded"
        );
        Ok(compressed)
    }

    /// Decompresses and decodes an archive.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Decompress` for corrupt LZ4 data and
    /// `StorageError::InvalidArchive` for a bad header, a size that does not
    /// match the group count, an unknown kind, or a group outside the grid.
    pub fn decode(data: &[u8]) -> StorageResult<Self> {
        let bytes = decompress_size_prepended(data)?;
        if bytes.len() < HEADER_SIZE {
            return Err(StorageError::InvalidArchive("truncated header".into()));
        }

        let header: ArchiveHeader = bytemuck::pod_read_unaligned(&bytes[..HEADER_SIZE]);
        if header.magic != ARCHIVE_MAGIC {
            return Err(StorageError::InvalidArchive("bad magic".into()));
        }
        if header.version != ARCHIVE_VERSION {
            return Err(StorageError::InvalidArchive(format!(
                "unsupported version {}",
                header.version
            )));
        }

        let body = &bytes[HEADER_SIZE..];
        let expected = header.count as usize * RECORD_SIZE;
        if body.len() != expected {
            return Err(StorageError::InvalidArchive(format!(
                "expected {expected} record bytes, found {}",
                body.len()
            )));
        }

        let groups = body
            .chunks_exact(RECORD_SIZE)
            .map(|chunk| {
                let r: GroupRecord = bytemuck::pod_read_unaligned(chunk);
                let rect = Rect::new(
                    usize::from(r.column),
                    usize::from(r.row),
                    usize::from(r.width),
                    usize::from(r.height),
                );
                Ok(GroupedTile {
                    kind: kind(r.kind)?,
                    column: rect.x,
                    row: rect.y,
                    width: rect.width,
                    height: rect.height,
                    up: kind(r.up)?,
                    right: kind(r.right)?,
                    down: kind(r.down)?,
                    left: kind(r.left)?,
                })
            })
            .collect::<StorageResult<Vec<_>>>()?;

        let archive = Self {
            width: usize::from(header.width),
            height: usize::from(header.height),
            groups,
        };
        // Every group must lie inside the grid
        render(&archive.groups, archive.width, archive.height, TileKind::Empty)
            .map_err(|e| StorageError::InvalidArchive(e.to_string()))?;
        Ok(archive)
    }

    /// Writes the compressed archive to a file.
    ///
    /// # Errors
    ///
    /// As [`GroupedArchive::encode`], plus `StorageError::Io`.
    pub fn save_compressed(&self, path: impl AsRef<Path>) -> StorageResult<usize> {
        let data = self.encode()?;
        std::fs::write(path, &data)?;
        Ok(data.len())
    }

    /// Reads a compressed archive from a file.
    ///
    /// # Errors
    ///
    /// As [`GroupedArchive::decode`], plus `StorageError::Io`.
    pub fn load_compressed(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::decode(&std::fs::read(path)?)
    }
}

fn narrow(value: usize, what: &str) -> StorageResult<u16> {
    u16::try_from(value)
        .map_err(|_| StorageError::InvalidArchive(format!("{what} {value} exceeds {}", u16::MAX)))
}

fn kind(value: u8) -> StorageResult<TileKind> {
    TileKind::from_u8(value)
        .ok_or_else(|| StorageError::InvalidArchive(format!("unknown tile kind {value}")))
}
