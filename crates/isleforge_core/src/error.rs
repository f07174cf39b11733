//! # World Error Types
//!
//! All errors that can occur while building, loading or reshaping a world.

use thiserror::Error;

/// Errors that can occur in the generation pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// A cell access fell outside the grid.
    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        /// Requested column.
        x: i64,
        /// Requested row.
        y: i64,
        /// Grid width.
        width: usize,
        /// Grid height.
        height: usize,
    },

    /// A persisted document could not be turned into a grid.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// A trim or resize asked for more cells than the source grid has.
    #[error(
        "requested {requested_width}x{requested_height} exceeds the {width}x{height} source grid"
    )]
    DimensionMismatch {
        /// Requested width (columns).
        requested_width: usize,
        /// Requested height (rows).
        requested_height: usize,
        /// Source width.
        width: usize,
        /// Source height.
        height: usize,
    },

    /// Generation parameters were rejected before any work started.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for world operations.
pub type WorldResult<T> = Result<T, WorldError>;
