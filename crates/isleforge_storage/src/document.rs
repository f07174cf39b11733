//! # World Document
//!
//! The JSON level format consumed by the game.
//!
//! ```json
//! {
//!   "id": 1001,
//!   "biome_tiles": { "tiles": ["2222", "2442", "2222"], "sheet_id": 1002 },
//!   "constructions_tiles": { "tiles": ["0000", "0000", "0000"], "sheet_id": 1003 },
//!   "entities": [],
//!   "creep_spawn_enabled": false,
//!   "creep_spawn_interval": 0.0,
//!   "is_interior": false
//! }
//! ```
//!
//! Older documents stored each row as a list of integers. Those load
//! transparently and are written back as strings.

use std::path::Path;

use isleforge_core::constants::SHEET_CONSTRUCTION_TILES;
use isleforge_core::{GridBuffer, TileKind, WorldError, WorldResult};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::{StorageError, StorageResult};

/// The two layers every document carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Ground: water, sand, grass, floor.
    Biome,
    /// Things built on the ground: walls.
    Constructions,
}

impl LayerKind {
    /// Both layers, in document order.
    pub const ALL: [Self; 2] = [Self::Biome, Self::Constructions];

    /// Field name in the document.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::Biome => "biome_tiles",
            Self::Constructions => "constructions_tiles",
        }
    }
}

/// One layer: a string per row plus the atlas its characters index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLayer {
    /// Rows, top to bottom. One character per tile.
    #[serde(deserialize_with = "deserialize_rows")]
    pub tiles: Vec<String>,
    /// Sprite sheet id.
    pub sheet_id: u32,
}

impl TileLayer {
    /// Encodes a grid.
    #[must_use]
    pub fn from_grid(grid: &GridBuffer, sheet_id: u32) -> Self {
        Self {
            tiles: grid.to_rows(),
            sheet_id,
        }
    }

    /// A `width x height` layer with nothing on it.
    #[must_use]
    pub fn blank(width: usize, height: usize, sheet_id: u32) -> Self {
        Self::from_grid(&GridBuffer::new(width, height, TileKind::Empty), sheet_id)
    }

    /// Decodes the rows.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::MalformedDocument` for ragged rows or characters
    /// outside the tile alphabet.
    pub fn grid(&self) -> WorldResult<GridBuffer> {
        GridBuffer::from_rows(&self.tiles)
    }

    /// Returns true if the layer has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Crops to `rows x cols`, keeping the layer centered. Empty layers are
    /// left as they are.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::MalformedDocument` if the layer does not decode and
    /// `WorldError::DimensionMismatch` if it is smaller than requested.
    pub fn trim(&self, rows: usize, cols: usize) -> WorldResult<Self> {
        if self.is_empty() {
            return Ok(self.clone());
        }
        Ok(Self::from_grid(&self.grid()?.trim(rows, cols)?, self.sheet_id))
    }

    fn empty_constructions() -> Self {
        Self {
            tiles: Vec::new(),
            sheet_id: SHEET_CONSTRUCTION_TILES,
        }
    }
}

/// A persisted world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldDocument {
    /// World identifier. Also the file stem.
    pub id: u32,
    /// Ground layer.
    pub biome_tiles: TileLayer,
    /// Construction layer.
    #[serde(default = "TileLayer::empty_constructions")]
    pub constructions_tiles: TileLayer,
    /// Entities placed by the level editor. Carried through untouched.
    #[serde(default)]
    pub entities: Vec<serde_json::Value>,
    /// Whether creeps spawn in this world.
    #[serde(default)]
    pub creep_spawn_enabled: bool,
    /// Seconds between creep spawns.
    #[serde(default)]
    pub creep_spawn_interval: f32,
    /// Kind shown where the biome layer is empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_biome: Option<TileKind>,
    /// Whether the world is indoors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_interior: Option<bool>,
}

impl WorldDocument {
    /// Creates a document with no entities, creeps disabled and no optional tags.
    #[must_use]
    pub fn new(id: u32, biome_tiles: TileLayer, constructions_tiles: TileLayer) -> Self {
        Self {
            id,
            biome_tiles,
            constructions_tiles,
            entities: Vec::new(),
            creep_spawn_enabled: false,
            creep_spawn_interval: 0.0,
            default_biome: None,
            is_interior: None,
        }
    }

    /// Parses a document, converting legacy integer rows, and checks that
    /// every layer decodes.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Json` for invalid JSON and
    /// `WorldError::MalformedDocument` for a missing field, a wrongly typed
    /// field, a legacy tile value with no character, ragged rows or a
    /// character outside the tile alphabet.
    pub fn from_json_str(source: &str) -> StorageResult<Self> {
        let doc: Self = serde_json::from_str(source).map_err(|e| {
            if e.is_data() || e.is_eof() {
                StorageError::World(WorldError::MalformedDocument(e.to_string()))
            } else {
                StorageError::Json(e)
            }
        })?;
        doc.validate()?;
        Ok(doc)
    }

    /// Serializes with two-space indentation.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Json` if an entity cannot be serialized.
    pub fn to_json_pretty(&self) -> StorageResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reads a document from disk.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the file cannot be read, otherwise as
    /// [`WorldDocument::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let doc = Self::from_json_str(&std::fs::read_to_string(path)?)?;
        debug!(id = doc.id, path = %path.display(), "World document loaded");
        Ok(doc)
    }

    /// Writes the document to disk, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> StorageResult<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json_pretty()?)?;
        debug!(id = self.id, path = %path.display(), "World document written");
        Ok(())
    }

    /// Returns a layer.
    #[must_use]
    pub const fn layer(&self, kind: LayerKind) -> &TileLayer {
        match kind {
            LayerKind::Biome => &self.biome_tiles,
            LayerKind::Constructions => &self.constructions_tiles,
        }
    }

    /// Decodes a layer into a grid.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::MalformedDocument` if the layer does not decode.
    pub fn layer_grid(&self, kind: LayerKind) -> WorldResult<GridBuffer> {
        self.layer(kind).grid().map_err(|e| match e {
            WorldError::MalformedDocument(msg) => {
                WorldError::MalformedDocument(format!("{}: {msg}", kind.field_name()))
            }
            other => other,
        })
    }

    /// Checks that every layer decodes.
    ///
    /// # Errors
    ///
    /// Returns the first layer's `WorldError::MalformedDocument`.
    pub fn validate(&self) -> WorldResult<()> {
        for kind in LayerKind::ALL {
            self.layer_grid(kind)?;
        }
        Ok(())
    }

    /// Crops every non-empty layer to `rows x cols`, keeping it centered.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::DimensionMismatch` if a layer is smaller than
    /// requested, or `WorldError::MalformedDocument` if it does not decode.
    pub fn trim(&self, rows: usize, cols: usize) -> WorldResult<Self> {
        Ok(Self {
            biome_tiles: self.biome_tiles.trim(rows, cols)?,
            constructions_tiles: self.constructions_tiles.trim(rows, cols)?,
            ..self.clone()
        })
    }
}

/// Rows as written today, or as integer lists by older tools.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRows {
    Text(Vec<String>),
    Legacy(Vec<Vec<u32>>),
}

fn deserialize_rows<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    match RawRows::deserialize(deserializer)? {
        RawRows::Text(rows) => Ok(rows),
        RawRows::Legacy(rows) => {
            debug!(rows = rows.len(), "Converting legacy integer rows");
            rows.iter()
                .enumerate()
                .map(|(y, row)| {
                    row.iter()
                        .map(|&value| {
                            legacy_char(value).ok_or_else(|| {
                                D::Error::custom(format!(
                                    "legacy tile value {value} at row {y} has no character"
                                ))
                            })
                        })
                        .collect()
                })
                .collect()
        }
    }
}

/// Integer tile value to its character: base 36, upper case.
#[must_use]
pub fn legacy_char(value: u32) -> Option<char> {
    char::from_digit(value, 36).map(|c| c.to_ascii_uppercase())
}
