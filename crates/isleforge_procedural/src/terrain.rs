//! # Terrain Synthesizer
//!
//! Noise-driven islands surrounded by a single connected ocean.
//!
//! ## Pipeline
//!
//! 1. **Elevation**: octaved simplex noise minus a radial falloff plus a bias;
//!    land (Sand) above the threshold, Water below. The border ring is Water.
//! 2. **Smoothing**: majority vote over Water, Sand, Grass.
//! 3. **Inland water**: Water not connected to the border becomes Sand.
//! 4. **Grass**: cells whose 17-cell neighborhood holds no Water become Grass,
//!    leaving a beach along every shore.
//!
//! The noise seed is drawn from the caller's `Rng`. A fixed rng seed therefore
//! reproduces the whole island, grass variants included.

use isleforge_core::{GridBuffer, TileKind};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::config::IslandConfig;
use crate::noise::{SimplexNoise, WorldSeed};
use crate::postprocess::{majority_smooth, place_by_neighborhood, reclassify_unreached};

/// Kinds that vote during smoothing, in tie-break order.
pub const SMOOTHING_ALPHABET: [TileKind; 3] = [TileKind::Water, TileKind::Sand, TileKind::Grass];

/// Neighborhood that must be free of Water for grass to grow.
///
/// A radius-2 cross plus a partial ring, not a full disk.
pub const GRASS_OFFSETS: [(i64, i64); 17] = [
    (0, 0),
    (0, -1),
    (0, -2),
    (0, 1),
    (0, 2),
    (-1, 0),
    (-2, 0),
    (1, 0),
    (2, 0),
    (1, 1),
    (1, -1),
    (-1, -1),
    (-1, 1),
    (-1, -2),
    (-1, 2),
    (-2, -1),
    (2, -1),
];

/// Sub-seed purposes.
mod channel {
    pub const ELEVATION: u64 = 1;
    pub const OFFSET: u64 = 2;
}

/// A finished island.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Island {
    /// Water, Sand and grass cells.
    pub grid: GridBuffer,
    /// Seed the elevation noise was built from.
    pub seed: WorldSeed,
    /// Inland water cells turned into Sand.
    pub ponds_filled: usize,
    /// Cells that became grass.
    pub grass_cells: usize,
}

/// Island generator.
#[derive(Clone, Debug)]
pub struct TerrainSynthesizer {
    config: IslandConfig,
}

impl TerrainSynthesizer {
    /// Creates a synthesizer. The config is assumed validated.
    #[must_use]
    pub fn new(config: &IslandConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Runs the full pipeline on a `width x height` grid.
    pub fn generate<R: Rng + ?Sized>(&self, width: usize, height: usize, rng: &mut R) -> Island {
        let seed = WorldSeed::from_rng(rng);

        let grid = self.elevation(width, height, seed);
        debug!(
            land = grid.count(TileKind::Sand),
            water = grid.count(TileKind::Water),
            "Elevation classified"
        );

        let grid = majority_smooth(&grid, &SMOOTHING_ALPHABET, self.config.smoothing_passes);
        debug!(passes = self.config.smoothing_passes, "Smoothing done");

        let (grid, ponds_filled) =
            reclassify_unreached(&grid, |kind| kind == TileKind::Water, TileKind::Sand);
        debug!(ponds_filled, "Inland water removed");

        let (grid, grass_cells) = self.plant_grass(&grid, rng);

        info!(
            width,
            height,
            seed = seed.value(),
            sand = grid.count(TileKind::Sand),
            grass = grass_cells,
            "Island generated"
        );

        Island {
            grid,
            seed,
            ponds_filled,
            grass_cells,
        }
    }

    /// Classifies every cell as Sand or Water from noise and falloff.
    ///
    /// The border ring is always Water.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn elevation(&self, width: usize, height: usize, seed: WorldSeed) -> GridBuffer {
        let noise = SimplexNoise::new(seed.derive(channel::ELEVATION));
        let offset = sample_offset(seed);
        let cfg = &self.config;
        let (w, h) = (width as f64, height as f64);

        GridBuffer::from_fn(width, height, |x, y| {
            if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
                return TileKind::Water;
            }
            let (fx, fy) = (x as f64, y as f64);
            let nx = (fx / w - 0.5) * cfg.frequency + offset;
            let ny = (fy / h - 0.5) * cfg.frequency + offset;
            let value = noise.octaved(nx, ny, cfg.octaves, cfg.persistence, cfg.lacunarity);

            let elevation = value - falloff(x, y, width, height) + cfg.bias;
            if elevation > cfg.sand_threshold {
                TileKind::Sand
            } else {
                TileKind::Water
            }
        })
    }

    /// Turns cells with no Water in their `GRASS_OFFSETS` neighborhood into
    /// grass. Cells past the edge count as Water.
    pub fn plant_grass<R: Rng + ?Sized>(&self, grid: &GridBuffer, rng: &mut R) -> (GridBuffer, usize) {
        let variants = self.config.grass_variants;
        place_by_neighborhood(
            grid,
            &GRASS_OFFSETS,
            TileKind::Water,
            |kind| kind != TileKind::Water,
            || {
                if variants {
                    TileKind::GRASS_KINDS.choose(&mut *rng).copied().unwrap_or(TileKind::Grass)
                } else {
                    TileKind::Grass
                }
            },
        )
    }
}

/// Radial falloff: squared distance from the grid center, normalized so the
/// corners reach 1.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn falloff(x: usize, y: usize, width: usize, height: usize) -> f64 {
    let fx = 2.0 * x as f64 / width as f64 - 1.0;
    let fy = 2.0 * y as f64 / height as f64 - 1.0;
    let distance = (fx * fx + fy * fy).sqrt() / std::f64::consts::SQRT_2;
    distance * distance
}

/// Shifts sampling to a seed-dependent region of the noise plane.
#[allow(clippy::cast_precision_loss)]
fn sample_offset(seed: WorldSeed) -> f64 {
    (seed.derive(channel::OFFSET).value() % 100_000) as f64 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::postprocess::unreached;
    use crate::seeded_rng;

    #[test]
    fn test_falloff_shape() {
        assert!(falloff(60, 40, 120, 80).abs() < 1e-12);
        assert!((falloff(0, 0, 120, 80) - 1.0).abs() < 1e-12);
        assert!(falloff(30, 40, 120, 80) < falloff(10, 40, 120, 80));
    }

    #[test]
    fn test_elevation_border_is_water() {
        let synth = TerrainSynthesizer::new(&IslandConfig::default());
        let grid = synth.elevation(40, 30, WorldSeed::new(5));
        for (x, y, kind) in grid.iter() {
            if x == 0 || y == 0 || x == 39 || y == 29 {
                assert_eq!(kind, TileKind::Water, "border cell ({x}, {y})");
            } else {
                assert!(matches!(kind, TileKind::Water | TileKind::Sand));
            }
        }
    }

    #[test]
    fn test_high_bias_makes_land() {
        let config = IslandConfig {
            bias: 10.0,
            ..IslandConfig::default()
        };
        let grid = TerrainSynthesizer::new(&config).elevation(20, 10, WorldSeed::new(1));
        assert_eq!(grid.count(TileKind::Sand), 18 * 8);
    }

    #[test]
    fn test_grass_needs_dry_neighborhood() {
        // 7x7 sand in a water ring: only the central 3x3 has water-free offsets
        let grid = GridBuffer::from_fn(9, 9, |x, y| {
            if x == 0 || y == 0 || x == 8 || y == 8 {
                TileKind::Water
            } else {
                TileKind::Sand
            }
        });
        let synth = TerrainSynthesizer::new(&IslandConfig::default());
        let (planted, count) = synth.plant_grass(&grid, &mut seeded_rng(0));
        assert_eq!(count, 3 * 3);
        assert_eq!(planted.get(4, 4).unwrap(), TileKind::Grass);
        assert_eq!(planted.get(2, 2).unwrap(), TileKind::Sand);
        assert_eq!(planted.get(3, 3).unwrap(), TileKind::Grass);
    }

    #[test]
    fn test_grass_variants_are_seeded() {
        let config = IslandConfig {
            grass_variants: true,
            ..IslandConfig::default()
        };
        let synth = TerrainSynthesizer::new(&config);
        let a = synth.generate(60, 40, &mut seeded_rng(21));
        let b = synth.generate(60, 40, &mut seeded_rng(21));
        assert_eq!(a, b);

        let flowered = (0..8).any(|seed| {
            let island = synth.generate(120, 80, &mut seeded_rng(seed));
            island.grid.cells().iter().any(|&k| k.is_grass() && k != TileKind::Grass)
        });
        assert!(flowered, "no flower grass in any island");
    }

    #[test]
    fn test_plain_grass_without_variants() {
        let synth = TerrainSynthesizer::new(&IslandConfig::default());
        for seed in 0..4 {
            let island = synth.generate(60, 40, &mut seeded_rng(seed));
            assert!(island.grid.cells().iter().all(|&k| !k.is_grass() || k == TileKind::Grass));
        }
    }

    #[test]
    fn test_no_inland_water() {
        let synth = TerrainSynthesizer::new(&IslandConfig::default());
        for seed in 0..5 {
            let island = synth.generate(60, 40, &mut seeded_rng(seed));
            assert!(unreached(&island.grid, |k| k == TileKind::Water).is_empty());
        }
    }
}
