//! # Storage Error Types
//!
//! All errors that can occur while reading or writing world files.

use isleforge_core::WorldError;
use thiserror::Error;

/// Errors that can occur at the storage boundary.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON document is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// LZ4 data could not be decompressed.
    #[error("decompression failed: {0}")]
    Decompress(#[from] lz4_flex::block::DecompressError),

    /// The content was readable but does not describe a valid world.
    #[error(transparent)]
    World(#[from] WorldError),

    /// A binary archive has a bad header, size or record.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
