//! # World Constants
//!
//! Defaults shared by the generators, the exporter and the command line.
//!
//! **CRITICAL:** The sheet identifiers and the world size are baked into the
//! game that reads these documents. Changing them breaks existing levels.

// =============================================================================
// WORLD SIZE
// =============================================================================

/// Default world width in tiles (columns).
pub const WORLD_WIDTH: usize = 120;

/// Default world height in tiles (rows).
pub const WORLD_HEIGHT: usize = 80;

// =============================================================================
// SPRITE SHEETS
// =============================================================================

/// Atlas used by the biome layer.
pub const SHEET_BIOME_TILES: u32 = 1002;

/// Atlas used by the constructions layer.
pub const SHEET_CONSTRUCTION_TILES: u32 = 1003;

// =============================================================================
// DUNGEONS
// =============================================================================

/// Smallest room edge carved by the partitioner.
pub const MIN_ROOM_SIZE: usize = 6;

/// Largest room edge carved by the partitioner.
pub const MAX_ROOM_SIZE: usize = 15;
