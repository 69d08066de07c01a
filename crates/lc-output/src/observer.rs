//! `SnapshotObserver<W>` — bridges `SimObserver` to a `SnapshotWriter`.

use tracing::info;

use lc_agent::AgentSet;
use lc_lanemap::Lanemap;
use lc_sim::{ObserverError, RunSummary, SimObserver};

use crate::snapshot::{build_agent_rows, build_edge_rows};
use crate::writer::SnapshotWriter;
use crate::OutputError;

/// A [`SimObserver`] that turns every checkpoint into edge and agent rows
/// and hands them to any [`SnapshotWriter`] backend.
///
/// Checkpoint write errors abort the run.  `finish` runs from
/// `on_run_end`, which cannot fail, so its error is stored; check it with
/// [`take_error`][Self::take_error] after `sim.run()` returns.
pub struct SnapshotObserver<W: SnapshotWriter> {
    writer:     W,
    written:    u64,
    last_error: Option<OutputError>,
}

impl<W: SnapshotWriter> SnapshotObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0, last_error: None }
    }

    /// Checkpoints successfully written.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Take the stored finalisation error (if any) after `sim.run()` returns.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<W: SnapshotWriter> SimObserver for SnapshotObserver<W> {
    fn on_checkpoint(
        &mut self,
        time:       f64,
        _step:      u64,
        agents:     &AgentSet,
        lanemap:    &Lanemap,
        delta_time: f64,
    ) -> Result<(), ObserverError> {
        let edges = build_edge_rows(lanemap, time, delta_time)?;
        let agents = build_agent_rows(agents, time, delta_time);
        self.writer.write_checkpoint(time, &edges, &agents)?;
        self.written += 1;
        Ok(())
    }

    fn on_run_end(&mut self, summary: &RunSummary) {
        if let Err(e) = self.writer.finish() {
            self.last_error.get_or_insert(e);
            return;
        }
        info!(checkpoints = self.written, end_time = summary.end_time, "snapshots finalised");
    }
}
