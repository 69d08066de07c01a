//! The `SnapshotWriter` trait implemented by all backend writers.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;

use crate::{AgentSnapshotRow, EdgeSnapshotRow, OutputError, OutputResult};

/// Trait implemented by CSV, SQLite, and Parquet writers.
pub trait SnapshotWriter {
    /// Persist both record sets for the checkpoint at `time`.
    ///
    /// Checkpoints are append-only: a `time` that has already been written
    /// is rejected.
    fn write_checkpoint(
        &mut self,
        time:   f64,
        edges:  &[EdgeSnapshotRow],
        agents: &[AgentSnapshotRow],
    ) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

/// Create `path`, failing with [`OutputError::SnapshotExists`] if it is
/// already there.
pub(crate) fn create_new(path: &Path) -> OutputResult<File> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => Ok(file),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(OutputError::SnapshotExists(path.to_path_buf())),
        Err(e) => Err(e.into()),
    }
}
