//! # ISLEFORGE Storage
//!
//! Everything that crosses the disk boundary.
//!
//! ## Formats
//!
//! - **World documents** (`*.json`): one string per row, one character per
//!   tile, for the biome and constructions layers
//! - **Grouped tiles** (`*.json`): maximal rectangles with neighbor kinds
//! - **Grouped archives** (`*.islg`): the same rectangles as 16-byte records,
//!   LZ4 compressed
//!
//! ## Example
//!
//! ```rust
//! use isleforge_core::{GridBuffer, TileKind};
//! use isleforge_storage::{WorldDocument, WorldExporter};
//!
//! let island = GridBuffer::new(4, 3, TileKind::Water);
//! let doc = WorldExporter::default().island_document(7, &island);
//! let json = doc.to_json_pretty()?;
//! assert_eq!(WorldDocument::from_json_str(&json)?, doc);
//! # Ok::<(), isleforge_storage::StorageError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod document;
pub mod error;
pub mod exporter;
pub mod grouped;

pub use document::{LayerKind, TileLayer, WorldDocument};
pub use error::{StorageError, StorageResult};
pub use exporter::{DirectoryStore, ExportOptions, WorldExporter};
pub use grouped::{GroupedArchive, GroupedTileRecord};
