//! Parquet output backend (feature `parquet`).
//!
//! Creates two files in the output directory:
//! - `edge_snapshots.parquet`
//! - `agent_snapshots.parquet`
//!
//! Each checkpoint is appended as one record batch with a `time` column.
//! A Parquet footer cannot be reopened for appending, so a directory that
//! already holds either file is refused rather than truncated.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Builder, UInt8Builder, UInt32Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::{self, SnapshotWriter};
use crate::{AgentSnapshotRow, EdgeSnapshotRow, OutputError, OutputResult};

fn edge_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("time",                DataType::Float64, false),
        Field::new("eid",                 DataType::UInt32,  false),
        Field::new("u",                   DataType::UInt32,  false),
        Field::new("v",                   DataType::UInt32,  false),
        Field::new("upstream_count",      DataType::UInt32,  false),
        Field::new("downstream_count",    DataType::UInt32,  false),
        Field::new("average_travel_time", DataType::Float64, false),
    ]))
}

fn agent_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("time",            DataType::Float64, false),
        Field::new("agent_id",        DataType::UInt32,  false),
        Field::new("origin",          DataType::UInt32,  false),
        Field::new("destination",     DataType::UInt32,  false),
        Field::new("agent_type",      DataType::UInt8,   false),
        Field::new("status",          DataType::UInt8,   false),
        Field::new("travel_dist_m",   DataType::Float64, false),
        Field::new("travel_time_s",   DataType::Float64, false),
        Field::new("average_speed",   DataType::Float64, true),
        Field::new("num_slowdown",    DataType::UInt32,  false),
        Field::new("num_lane_change", DataType::UInt32,  false),
        Field::new("num_in_queue",    DataType::UInt32,  false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Writes checkpoint snapshots to two Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footer; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    edges:        Option<ArrowWriter<File>>,
    agents:       Option<ArrowWriter<File>>,
    edge_schema:  Arc<Schema>,
    agent_schema: Arc<Schema>,
    last_time:    Option<f64>,
}

impl ParquetWriter {
    /// Create both Parquet files in `dir`.
    ///
    /// Fails with [`OutputError::SnapshotExists`] if either file is already
    /// present; neither file is touched in that case.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        if !dir.is_dir() {
            return Err(OutputError::MissingDirectory(dir.to_path_buf()));
        }
        let edge_path = dir.join("edge_snapshots.parquet");
        let agent_path = dir.join("agent_snapshots.parquet");
        for path in [&edge_path, &agent_path] {
            if path.exists() {
                return Err(OutputError::SnapshotExists(path.clone()));
            }
        }

        let edge_schema = edge_schema();
        let agent_schema = agent_schema();

        let edges = ArrowWriter::try_new(
            writer::create_new(&edge_path)?,
            Arc::clone(&edge_schema),
            Some(snappy_props()),
        )?;
        let agents = ArrowWriter::try_new(
            writer::create_new(&agent_path)?,
            Arc::clone(&agent_schema),
            Some(snappy_props()),
        )?;

        Ok(Self {
            edges:     Some(edges),
            agents:    Some(agents),
            edge_schema,
            agent_schema,
            last_time: None,
        })
    }

    fn edge_batch(&self, rows: &[EdgeSnapshotRow]) -> OutputResult<RecordBatch> {
        let mut time     = Float64Builder::new();
        let mut eid      = UInt32Builder::new();
        let mut u        = UInt32Builder::new();
        let mut v        = UInt32Builder::new();
        let mut upstream = UInt32Builder::new();
        let mut down     = UInt32Builder::new();
        let mut avg_time = Float64Builder::new();

        for row in rows {
            time.append_value(row.time);
            eid.append_value(row.eid);
            u.append_value(row.u);
            v.append_value(row.v);
            upstream.append_value(row.upstream_count);
            down.append_value(row.downstream_count);
            avg_time.append_value(row.average_travel_time);
        }

        Ok(RecordBatch::try_new(
            Arc::clone(&self.edge_schema),
            vec![
                Arc::new(time.finish()),
                Arc::new(eid.finish()),
                Arc::new(u.finish()),
                Arc::new(v.finish()),
                Arc::new(upstream.finish()),
                Arc::new(down.finish()),
                Arc::new(avg_time.finish()),
            ],
        )?)
    }

    fn agent_batch(&self, rows: &[AgentSnapshotRow]) -> OutputResult<RecordBatch> {
        let mut time       = Float64Builder::new();
        let mut agent_id   = UInt32Builder::new();
        let mut origin     = UInt32Builder::new();
        let mut dest       = UInt32Builder::new();
        let mut agent_type = UInt8Builder::new();
        let mut status     = UInt8Builder::new();
        let mut dist       = Float64Builder::new();
        let mut travel     = Float64Builder::new();
        let mut speed      = Float64Builder::new();
        let mut slowdown   = UInt32Builder::new();
        let mut lane_chg   = UInt32Builder::new();
        let mut queued     = UInt32Builder::new();

        for row in rows {
            time.append_value(row.time);
            agent_id.append_value(row.agent_id);
            origin.append_value(row.origin);
            dest.append_value(row.destination);
            agent_type.append_value(row.agent_type);
            status.append_value(row.status);
            dist.append_value(row.travel_dist_m);
            travel.append_value(row.travel_time_s);
            speed.append_option(row.average_speed);
            slowdown.append_value(row.num_slowdown);
            lane_chg.append_value(row.num_lane_change);
            queued.append_value(row.num_in_queue);
        }

        Ok(RecordBatch::try_new(
            Arc::clone(&self.agent_schema),
            vec![
                Arc::new(time.finish()),
                Arc::new(agent_id.finish()),
                Arc::new(origin.finish()),
                Arc::new(dest.finish()),
                Arc::new(agent_type.finish()),
                Arc::new(status.finish()),
                Arc::new(dist.finish()),
                Arc::new(travel.finish()),
                Arc::new(speed.finish()),
                Arc::new(slowdown.finish()),
                Arc::new(lane_chg.finish()),
                Arc::new(queued.finish()),
            ],
        )?)
    }
}

impl SnapshotWriter for ParquetWriter {
    fn write_checkpoint(
        &mut self,
        time:   f64,
        edges:  &[EdgeSnapshotRow],
        agents: &[AgentSnapshotRow],
    ) -> OutputResult<()> {
        if self.last_time.is_some_and(|last| time <= last) {
            return Err(OutputError::CheckpointExists { time });
        }

        let edge_batch = self.edge_batch(edges)?;
        let agent_batch = self.agent_batch(agents)?;

        let (Some(edge_w), Some(agent_w)) = (self.edges.as_mut(), self.agents.as_mut()) else {
            return Err(OutputError::WriterClosed { time });
        };
        if edge_batch.num_rows() > 0 {
            edge_w.write(&edge_batch)?;
        }
        if agent_batch.num_rows() > 0 {
            agent_w.write(&agent_batch)?;
        }
        self.last_time = Some(time);
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if let Some(w) = self.edges.take() {
            w.close()?;
        }
        if let Some(w) = self.agents.take() {
            w.close()?;
        }
        Ok(())
    }
}
