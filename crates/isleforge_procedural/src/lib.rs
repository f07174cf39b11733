//! # ISLEFORGE Procedural Generation
//!
//! Deterministic, offline generation of tile worlds.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed and same config always produce the same world
//! 2. **Single writer**: Each stage owns the grid until it hands it to the next
//! 3. **Total passes**: Post-processing never fails on a well-formed grid
//!
//! ## Core Components
//!
//! - `RoomPartitioner`: BSP room carving, L-shaped corridors, wall thinning
//! - `TerrainSynthesizer`: Noise islands with beaches and inland grass
//! - `postprocess`: Smoothing, border flood fill, neighborhood placement
//! - `grouping`: Maximal-rectangle compression with neighbor tagging
//! - `SimplexNoise`: Coherent 2D noise
//!
//! ## Example
//!
//! ```rust
//! use isleforge_procedural::{seeded_rng, GenerationConfig, RoomPartitioner};
//!
//! let config = GenerationConfig::default();
//! let mut rng = seeded_rng(7);
//! let dungeon = RoomPartitioner::new(&config.dungeon)
//!     .generate(config.width, config.height, &mut rng)?;
//! assert!(!dungeon.rooms.is_empty());
//! # Ok::<(), isleforge_core::WorldError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod dungeon;
pub mod grouping;
pub mod noise;
pub mod postprocess;
pub mod terrain;

pub use config::{DungeonConfig, GenerationConfig, IslandConfig};
pub use dungeon::{Dungeon, Room, RoomPartitioner};
pub use grouping::{GroupedTile, GroupingStats, TaggedCell};
pub use noise::{SimplexNoise, WorldSeed};
pub use rand_chacha::ChaCha8Rng;
pub use terrain::{Island, TerrainSynthesizer};

use rand::SeedableRng;

/// Creates the reproducible random source used by every generator.
#[must_use]
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}
