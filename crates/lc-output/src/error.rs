//! Error types for lc-output.

use std::path::PathBuf;

use lc_core::{EdgeId, MergedEdgeId};
use thiserror::Error;

/// Errors that can occur when writing checkpoint snapshots.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("output directory {0} does not exist")]
    MissingDirectory(PathBuf),

    #[error("snapshot file {0} already exists")]
    SnapshotExists(PathBuf),

    #[error("writer is closed; checkpoint at t = {time} s was not written")]
    WriterClosed { time: f64 },

    #[error("checkpoint at t = {time} s is not after the last written checkpoint")]
    CheckpointExists { time: f64 },

    #[error("{mid} (mapped from {eid}) has no edge aggregate")]
    MissingAggregate { mid: MergedEdgeId, eid: EdgeId },

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "parquet")]
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[cfg(feature = "parquet")]
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
