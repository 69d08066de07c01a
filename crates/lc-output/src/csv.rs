//! CSV output backend.
//!
//! Creates two files in the output directory per checkpoint:
//! - `edge_data_<t>.csv`
//! - `agents_data_<t>.csv`
//!
//! `<t>` is the simulated time in seconds (`100`, `2.5`, …), rounded to
//! the microsecond so `3 × 0.1` is tagged `0.3`.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::Writer;
use tracing::debug;

use crate::writer::{self, SnapshotWriter};
use crate::{AgentSnapshotRow, EdgeSnapshotRow, OutputError, OutputResult};

pub const EDGE_HEADER: [&str; 6] = [
    "eid",
    "u",
    "v",
    "upstream_count",
    "downstream_count",
    "average_travel_time(s)",
];

pub const AGENT_HEADER: [&str; 11] = [
    "aid",
    "ori",
    "dest",
    "type",
    "status",
    "travel_dist(m)",
    "travel_time(s)",
    "ave_speed(m/s)",
    "num_slowdown",
    "num_lane_change",
    "num_in_queue",
];

/// Writes one pair of CSV files per checkpoint.
pub struct CsvWriter {
    dir:         PathBuf,
    checkpoints: u64,
}

impl CsvWriter {
    /// `dir` must already exist.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        if !dir.is_dir() {
            return Err(OutputError::MissingDirectory(dir.to_path_buf()));
        }
        Ok(Self { dir: dir.to_path_buf(), checkpoints: 0 })
    }

    pub fn edge_path(&self, time: f64) -> PathBuf {
        self.dir.join(format!("edge_data_{}.csv", time_tag(time)))
    }

    pub fn agent_path(&self, time: f64) -> PathBuf {
        self.dir.join(format!("agents_data_{}.csv", time_tag(time)))
    }

    /// Checkpoints written so far.
    pub fn checkpoints(&self) -> u64 {
        self.checkpoints
    }
}

/// File-name form of a checkpoint time.
pub fn time_tag(time: f64) -> String {
    let micros = (time * 1e6).round();
    // `+ 0.0` folds `-0` into `0`.
    format!("{}", micros / 1e6 + 0.0)
}

fn create_new(path: &Path) -> OutputResult<Writer<File>> {
    Ok(Writer::from_writer(writer::create_new(path)?))
}

impl SnapshotWriter for CsvWriter {
    fn write_checkpoint(
        &mut self,
        time:   f64,
        edges:  &[EdgeSnapshotRow],
        agents: &[AgentSnapshotRow],
    ) -> OutputResult<()> {
        let edge_path = self.edge_path(time);
        let agent_path = self.agent_path(time);
        // Check both before creating either.
        for path in [&edge_path, &agent_path] {
            if path.exists() {
                return Err(OutputError::SnapshotExists(path.clone()));
            }
        }

        let mut w = create_new(&edge_path)?;
        w.write_record(EDGE_HEADER)?;
        for row in edges {
            w.write_record(&[
                row.eid.to_string(),
                row.u.to_string(),
                row.v.to_string(),
                row.upstream_count.to_string(),
                row.downstream_count.to_string(),
                row.average_travel_time.to_string(),
            ])?;
        }
        w.flush()?;

        let mut w = create_new(&agent_path)?;
        w.write_record(AGENT_HEADER)?;
        for row in agents {
            w.write_record(&[
                row.agent_id.to_string(),
                row.origin.to_string(),
                row.destination.to_string(),
                row.agent_type.to_string(),
                row.status.to_string(),
                row.travel_dist_m.to_string(),
                row.travel_time_s.to_string(),
                row.average_speed.map(|s| s.to_string()).unwrap_or_default(),
                row.num_slowdown.to_string(),
                row.num_lane_change.to_string(),
                row.num_in_queue.to_string(),
            ])?;
        }
        w.flush()?;

        self.checkpoints += 1;
        debug!(time, edges = edges.len(), agents = agents.len(), "csv checkpoint written");
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        // Every checkpoint is flushed and closed as it is written.
        Ok(())
    }
}
