//! # Generation Config
//!
//! Tunables for both generators, loaded once from TOML.
//!
//! Every field has a default, so a config file only lists what it changes:
//!
//! ```toml
//! width = 64
//!
//! [island]
//! smoothing_passes = 5
//! grass_variants = true
//! ```

use std::path::Path;

use isleforge_core::constants::{MAX_ROOM_SIZE, MIN_ROOM_SIZE, WORLD_HEIGHT, WORLD_WIDTH};
use isleforge_core::{WorldError, WorldResult};
use serde::{Deserialize, Serialize};

/// Smallest world the generators accept on either axis.
///
/// Both generators reserve a one-cell border ring.
pub const MIN_WORLD_EDGE: usize = 3;

/// Upper bound on smoothing passes.
pub const MAX_SMOOTHING_PASSES: u32 = 16;

/// Top-level generation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// World width in tiles.
    pub width: usize,
    /// World height in tiles.
    pub height: usize,
    /// Dungeon parameters.
    pub dungeon: DungeonConfig,
    /// Island parameters.
    pub island: IslandConfig,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            dungeon: DungeonConfig::default(),
            island: IslandConfig::default(),
        }
    }
}

/// BSP dungeon parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DungeonConfig {
    /// Smallest room edge.
    pub min_room_size: usize,
    /// Largest room edge. A region narrower than twice this on both axes is a leaf.
    pub max_room_size: usize,
    /// Aspect ratio at which the longer axis is always the one split.
    pub split_ratio: f64,
    /// Lower bound of the split position, as a fraction of the axis length.
    pub split_min: f64,
    /// Upper bound of the split position, as a fraction of the axis length.
    pub split_max: f64,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            min_room_size: MIN_ROOM_SIZE,
            max_room_size: MAX_ROOM_SIZE,
            split_ratio: 1.25,
            split_min: 0.3,
            split_max: 0.7,
        }
    }
}

/// Noise island parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IslandConfig {
    /// Noise frequency applied to centered coordinates.
    pub frequency: f64,
    /// Number of noise octaves.
    pub octaves: u32,
    /// Amplitude decay per octave.
    pub persistence: f64,
    /// Frequency growth per octave.
    pub lacunarity: f64,
    /// Constant added to every elevation sample. Larger means more land.
    pub bias: f64,
    /// Elevation above which a cell is land.
    pub sand_threshold: f64,
    /// Majority-vote smoothing passes.
    pub smoothing_passes: u32,
    /// Scatter flower grass variants instead of plain grass.
    pub grass_variants: bool,
}

impl Default for IslandConfig {
    fn default() -> Self {
        Self {
            frequency: 0.8,
            octaves: 3,
            persistence: 0.5,
            lacunarity: 2.0,
            bias: 0.6,
            sand_threshold: 0.05,
            smoothing_passes: 3,
            grass_variants: false,
        }
    }
}

impl GenerationConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::InvalidConfig` on a syntax error, an unknown key,
    /// or a value rejected by [`GenerationConfig::validate`].
    pub fn from_toml_str(source: &str) -> WorldResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| WorldError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::InvalidConfig` if the file cannot be read or its
    /// content is rejected by [`GenerationConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> WorldResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            WorldError::InvalidConfig(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&source)
    }

    /// Checks every parameter against the ranges the generators support.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> WorldResult<()> {
        if self.width < MIN_WORLD_EDGE || self.height < MIN_WORLD_EDGE {
            return Err(invalid(format!(
                "world must be at least {MIN_WORLD_EDGE}x{MIN_WORLD_EDGE}, got {}x{}",
                self.width, self.height
            )));
        }
        self.dungeon.validate()?;
        self.island.validate()
    }
}

impl DungeonConfig {
    /// Checks room sizes and split bounds.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> WorldResult<()> {
        if self.min_room_size == 0 {
            return Err(invalid("dungeon.min_room_size must be positive".into()));
        }
        if self.max_room_size < self.min_room_size {
            return Err(invalid(format!(
                "dungeon.max_room_size ({}) is below min_room_size ({})",
                self.max_room_size, self.min_room_size
            )));
        }
        if !self.split_ratio.is_finite() || self.split_ratio < 1.0 {
            return Err(invalid("dungeon.split_ratio must be finite and at least 1".into()));
        }
        let in_unit = |v: f64| v.is_finite() && v > 0.0 && v < 1.0;
        if !in_unit(self.split_min) || !in_unit(self.split_max) || self.split_min > self.split_max {
            return Err(invalid(
                "dungeon.split_min and split_max must satisfy 0 < min <= max < 1".into(),
            ));
        }
        Ok(())
    }
}

impl IslandConfig {
    /// Checks noise parameters and pass counts.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> WorldResult<()> {
        if self.octaves == 0 {
            return Err(invalid("island.octaves must be positive".into()));
        }
        let finite = [
            ("frequency", self.frequency),
            ("persistence", self.persistence),
            ("lacunarity", self.lacunarity),
            ("bias", self.bias),
            ("sand_threshold", self.sand_threshold),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("island.{name} must be finite")));
        }
        if self.smoothing_passes > MAX_SMOOTHING_PASSES {
            return Err(invalid(format!(
                "island.smoothing_passes must be at most {MAX_SMOOTHING_PASSES}"
            )));
        }
        Ok(())
    }
}

fn invalid(message: String) -> WorldError {
    WorldError::InvalidConfig(message)
}
