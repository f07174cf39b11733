//! # World Exporter
//!
//! Turns generated grids into world documents and files.
//!
//! No generation happens here. Dungeons are split into a floor layer and a
//! wall layer; islands go on the biome layer with a blank constructions
//! layer of the same size.

use std::path::{Path, PathBuf};

use isleforge_core::constants::{SHEET_BIOME_TILES, SHEET_CONSTRUCTION_TILES};
use isleforge_core::{GridBuffer, TileKind, WorldError, WorldResult};
use isleforge_procedural::Dungeon;
use tracing::info;

use crate::document::{TileLayer, WorldDocument};
use crate::error::StorageResult;

/// Layer metadata written into every exported document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    /// Sheet for the biome layer.
    pub biome_sheet: u32,
    /// Sheet for the constructions layer.
    pub construction_sheet: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            biome_sheet: SHEET_BIOME_TILES,
            construction_sheet: SHEET_CONSTRUCTION_TILES,
        }
    }
}

/// Builds world documents from grids.
#[derive(Clone, Debug, Default)]
pub struct WorldExporter {
    options: ExportOptions,
}

impl WorldExporter {
    /// Creates an exporter.
    #[must_use]
    pub const fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    /// Builds a document from a biome grid and a constructions grid.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::DimensionMismatch` if the grids differ in size.
    pub fn document(&self, id: u32, biome: &GridBuffer, constructions: &GridBuffer) -> WorldResult<WorldDocument> {
        if biome.width() != constructions.width() || biome.height() != constructions.height() {
            return Err(WorldError::DimensionMismatch {
                requested_width: constructions.width(),
                requested_height: constructions.height(),
                width: biome.width(),
                height: biome.height(),
            });
        }
        Ok(WorldDocument::new(
            id,
            TileLayer::from_grid(biome, self.options.biome_sheet),
            TileLayer::from_grid(constructions, self.options.construction_sheet),
        ))
    }

    /// Dungeon document: floor on the biome layer, walls on the
    /// constructions layer, `default_biome` set to Nothing.
    #[must_use]
    pub fn dungeon_document(&self, id: u32, dungeon: &Dungeon) -> WorldDocument {
        let mut doc = WorldDocument::new(
            id,
            TileLayer::from_grid(&dungeon.biome_layer(), self.options.biome_sheet),
            TileLayer::from_grid(&dungeon.construction_layer(), self.options.construction_sheet),
        );
        doc.default_biome = Some(TileKind::Empty);
        doc
    }

    /// Island document: the grid on the biome layer, a blank constructions
    /// layer, and `is_interior` set to false.
    #[must_use]
    pub fn island_document(&self, id: u32, island: &GridBuffer) -> WorldDocument {
        let mut doc = WorldDocument::new(
            id,
            TileLayer::from_grid(island, self.options.biome_sheet),
            TileLayer::blank(island.width(), island.height(), self.options.construction_sheet),
        );
        doc.is_interior = Some(false);
        doc
    }
}

/// A directory of `<id>.json` world documents.
#[derive(Clone, Debug)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    /// Opens a store rooted at `root`. Nothing is touched until the first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the document for `id`.
    #[must_use]
    pub fn path_for(&self, id: u32) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `doc`, creating the directory if needed. Returns the file path.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory or file cannot be written.
    pub fn save(&self, doc: &WorldDocument) -> StorageResult<PathBuf> {
        std::fs::create_dir_all(&self.root)?;
        let path = self.path_for(doc.id);
        doc.save(&path)?;
        info!(id = doc.id, path = %path.display(), "World saved");
        Ok(path)
    }

    /// Reads the document for `id`.
    ///
    /// # Errors
    ///
    /// As [`WorldDocument::load`].
    pub fn load(&self, id: u32) -> StorageResult<WorldDocument> {
        WorldDocument::load(self.path_for(id))
    }
}
