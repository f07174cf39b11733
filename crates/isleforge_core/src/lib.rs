//! # ISLEFORGE Core
//!
//! Shared building blocks for offline world generation.
//!
//! ## Architecture Rules
//!
//! 1. **One grid, one writer** - A `GridBuffer` is owned by exactly one stage at a time
//! 2. **Checked access** - Reads and writes outside the grid are reported, never truncated
//! 3. **Fixed alphabet** - Tile characters must round-trip with existing world documents
//!
//! ## Example
//!
//! ```rust
//! use isleforge_core::{GridBuffer, TileKind};
//!
//! let mut grid = GridBuffer::new(3, 2, TileKind::Water);
//! grid.set(1, 1, TileKind::Sand)?;
//! assert_eq!(grid.to_rows(), vec!["222".to_string(), "242".to_string()]);
//! # Ok::<(), isleforge_core::WorldError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod constants;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod tile;

pub use error::{WorldError, WorldResult};
pub use geometry::{Point, Rect};
pub use grid::GridBuffer;
pub use tile::TileKind;
