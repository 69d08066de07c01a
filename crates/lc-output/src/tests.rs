//! Unit tests for lc-output.

#[cfg(test)]
mod fixtures {
    use lc_agent::{AgentSet, AgentSetBuilder, AgentStatus};
    use lc_core::{EdgeId, MergedEdgeId, VertexId};
    use lc_lanemap::{Lanemap, LanemapBuilder};

    use crate::{AgentSnapshotRow, EdgeSnapshotRow};

    /// Two merged edges whose mid order is the reverse of their eid order.
    pub fn lanemap() -> Lanemap {
        let mut b = LanemapBuilder::new();
        b.add_merged_edge(EdgeId(0), MergedEdgeId(5), [VertexId(0), VertexId(1)], 20.0, 1);
        b.add_merged_edge(EdgeId(1), MergedEdgeId(2), [VertexId(1), VertexId(2)], 30.0, 2);
        b.add_intersection(VertexId(0));
        b.add_intersection(VertexId(1));
        b.add_intersection(VertexId(2));
        let mut map = b.build().unwrap();

        let edges = map.edge_aggregates_mut();
        edges[2].upstream_count = 4;
        edges[2].downstream_count = 2;
        edges[2].period_cum_travel_steps = 7;
        edges[5].upstream_count = 1;
        map
    }

    /// Agent 0 has moved for four steps; agent 1 never moved.
    pub fn agents() -> AgentSet {
        let mut b = AgentSetBuilder::new(4);
        b.add_trip(VertexId(0), VertexId(2), 1);
        b.add_trip(VertexId(2), VertexId(0), 0);
        let mut set = b.build();
        let a = &mut set.agents[0];
        a.status = AgentStatus::Active;
        a.stats.cum_length_m = 42.5;
        a.stats.cum_speed = 20.0;
        a.stats.num_steps = 4;
        a.stats.slow_down_steps = 1;
        a.stats.num_lane_change = 2;
        a.stats.num_steps_in_queue = 3;
        set
    }

    pub fn edge_row(time: f64, eid: u32) -> EdgeSnapshotRow {
        EdgeSnapshotRow {
            time,
            eid,
            u: eid,
            v: eid + 1,
            upstream_count: 3,
            downstream_count: 1,
            average_travel_time: 1.5,
        }
    }

    pub fn agent_row(time: f64, agent_id: u32, average_speed: Option<f64>) -> AgentSnapshotRow {
        AgentSnapshotRow {
            time,
            agent_id,
            origin: 0,
            destination: 2,
            agent_type: 0,
            status: 1,
            travel_dist_m: 10.0,
            travel_time_s: 2.0,
            average_speed,
            num_slowdown: 0,
            num_lane_change: 1,
            num_in_queue: 0,
        }
    }
}

// ── Row building ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod snapshot_tests {
    use super::fixtures;
    use crate::{NO_TRAVEL_TIME, average_travel_time, build_agent_rows, build_edge_rows};

    #[test]
    fn travel_time_sentinel() {
        assert_eq!(average_travel_time(0, 0, 0.5), NO_TRAVEL_TIME);
        assert_eq!(average_travel_time(99, 0, 0.5), -1.0);
    }

    #[test]
    fn travel_time_is_not_truncated() {
        // 7 steps over 2 vehicles = 3.5 steps, × 0.5 s.
        assert_eq!(average_travel_time(7, 2, 0.5), 1.75);
        assert_eq!(average_travel_time(6, 3, 1.0), 2.0);
    }

    #[test]
    fn edge_rows_follow_mid_order() {
        let rows = build_edge_rows(&fixtures::lanemap(), 100.0, 0.5).unwrap();
        let eids: Vec<u32> = rows.iter().map(|r| r.eid).collect();
        // mid 2 (eid 1) before mid 5 (eid 0).
        assert_eq!(eids, [1, 0]);

        assert_eq!((rows[0].u, rows[0].v), (1, 2));
        assert_eq!(rows[0].upstream_count, 4);
        assert_eq!(rows[0].downstream_count, 2);
        assert_eq!(rows[0].average_travel_time, 1.75);
        assert_eq!(rows[1].average_travel_time, NO_TRAVEL_TIME);
        assert!(rows.iter().all(|r| r.time == 100.0));
    }

    #[test]
    fn agent_rows() {
        let rows = build_agent_rows(&fixtures::agents(), 60.0, 0.5);
        assert_eq!(rows.len(), 2);

        let moved = &rows[0];
        assert_eq!(moved.agent_id, 0);
        assert_eq!((moved.origin, moved.destination, moved.agent_type), (0, 2, 1));
        assert_eq!(moved.status, 1);
        assert_eq!(moved.travel_dist_m, 42.5);
        assert_eq!(moved.travel_time_s, 2.0);
        assert_eq!(moved.average_speed, Some(5.0));
        assert_eq!((moved.num_slowdown, moved.num_lane_change, moved.num_in_queue), (1, 2, 3));

        let idle = &rows[1];
        assert_eq!(idle.agent_id, 1);
        assert_eq!(idle.status, 0);
        assert_eq!(idle.travel_time_s, 0.0);
        assert_eq!(idle.average_speed, None);
    }
}

// ── CSV tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use super::fixtures::{agent_row, edge_row};
    use crate::csv::{AGENT_HEADER, CsvWriter, EDGE_HEADER, time_tag};
    use crate::writer::SnapshotWriter;
    use crate::OutputError;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn read(path: std::path::PathBuf) -> (Vec<String>, Vec<Vec<String>>) {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        let headers = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        let rows = rdr
            .records()
            .map(|r| r.unwrap().iter().map(str::to_owned).collect())
            .collect();
        (headers, rows)
    }

    #[test]
    fn files_tagged_by_time() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_checkpoint(100.0, &[], &[]).unwrap();
        w.write_checkpoint(2.5, &[], &[]).unwrap();

        assert!(dir.path().join("edge_data_100.csv").exists());
        assert!(dir.path().join("agents_data_100.csv").exists());
        assert!(dir.path().join("edge_data_2.5.csv").exists());
        assert!(dir.path().join("agents_data_2.5.csv").exists());
        assert_eq!(w.checkpoints(), 2);
    }

    #[test]
    fn tag_hides_binary_rounding() {
        assert_eq!(time_tag(3.0 * 0.1), "0.3");
        assert_eq!(time_tag(0.1 + 0.2), "0.3");
        assert_eq!(time_tag(7200.0), "7200");
        assert_eq!(time_tag(-0.0), "0");

        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_checkpoint(0.0 + 3.0 * 0.1, &[], &[]).unwrap();
        assert!(dir.path().join("edge_data_0.3.csv").exists());
        assert!(dir.path().join("agents_data_0.3.csv").exists());
    }

    #[test]
    fn headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_checkpoint(10.0, &[], &[]).unwrap();

        let (edge_headers, edge_rows) = read(w.edge_path(10.0));
        assert_eq!(edge_headers, EDGE_HEADER);
        assert!(edge_rows.is_empty());

        let (agent_headers, _) = read(w.agent_path(10.0));
        assert_eq!(agent_headers, AGENT_HEADER);
    }

    #[test]
    fn rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let mut sentinel = edge_row(10.0, 4);
        sentinel.downstream_count = 0;
        sentinel.average_travel_time = -1.0;
        w.write_checkpoint(
            10.0,
            &[edge_row(10.0, 3), sentinel],
            &[agent_row(10.0, 0, Some(4.5)), agent_row(10.0, 1, None)],
        )
        .unwrap();

        let (_, edges) = read(w.edge_path(10.0));
        assert_eq!(edges[0], ["3", "3", "4", "3", "1", "1.5"]);
        assert_eq!(edges[1][5], "-1");

        let (_, agents) = read(w.agent_path(10.0));
        assert_eq!(agents[0], ["0", "0", "2", "0", "1", "10", "2", "4.5", "0", "1", "0"]);
        // Undefined average speed is an empty cell.
        assert_eq!(agents[1][7], "");
    }

    #[test]
    fn refuses_to_overwrite() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_checkpoint(5.0, &[edge_row(5.0, 0)], &[]).unwrap();

        let err = w.write_checkpoint(5.0, &[], &[]).unwrap_err();
        assert!(matches!(err, OutputError::SnapshotExists(_)));
        // The original snapshot is untouched.
        let (_, edges) = read(w.edge_path(5.0));
        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn stray_agent_file_blocks_checkpoint() {
        let dir = tmp();
        std::fs::write(dir.path().join("agents_data_7.csv"), "x").unwrap();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        assert!(matches!(w.write_checkpoint(7.0, &[], &[]), Err(OutputError::SnapshotExists(_))));
        // Neither file of the pair was created.
        assert!(!dir.path().join("edge_data_7.csv").exists());
    }

    #[test]
    fn missing_directory() {
        let dir = tmp();
        let result = CsvWriter::new(&dir.path().join("nope"));
        assert!(matches!(result, Err(OutputError::MissingDirectory(_))));
    }

    #[test]
    fn finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

// ── Observer integration ──────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use tempfile::TempDir;

    use lc_agent::{Agent, AgentSetBuilder};
    use lc_core::{AgentRng, SimConfig, VertexId};
    use lc_device::{HostDevice, StepContext, StepKernel, Transition};
    use lc_lanemap::Lanemap;
    use lc_network::NetworkBuilder;
    use lc_sim::{SimBuilder, SimError};

    use crate::{CsvWriter, SnapshotObserver};

    /// Each step: one metre, 2 m/s; leaves its first edge on step 1 after
    /// three steps.
    struct Crawl;

    impl StepKernel for Crawl {
        fn step_agent(&self, ctx: &StepContext<'_>, agent: &mut Agent, _rng: &mut AgentRng) -> Vec<Transition> {
            let Some(mid) = agent.route.get(0) else { return vec![] };
            agent.stats.num_steps += 1;
            agent.stats.cum_length_m += 1.0;
            agent.stats.cum_speed += 2.0;
            match ctx.step {
                0 => vec![Transition::Enter { mid }],
                1 => vec![Transition::Leave { mid, travel_steps: 3 }],
                _ => vec![],
            }
        }
    }

    fn run_into(dir: &TempDir) -> Result<SnapshotObserver<CsvWriter>, SimError> {
        let mut nb = NetworkBuilder::new(3);
        nb.add_edge(VertexId(0), VertexId(1), 1.0, 10.0);
        nb.add_edge(VertexId(1), VertexId(2), 1.0, 10.0);
        let net = nb.build().unwrap();
        let lanemap = Lanemap::from_network(&net, 1).unwrap();

        let mut ab = AgentSetBuilder::new(8);
        ab.add_trip(VertexId(0), VertexId(2), 0);
        ab.add_trip(VertexId(2), VertexId(0), 0);

        let config = SimConfig {
            start_time: 0.0,
            end_time: 6.0,
            save_interval: 2.0,
            delta_time: 1.0,
            block_size: 32,
            seed: 3,
            num_threads: Some(1),
        };
        let (mut sim, _) = SimBuilder::new(config, &net, ab.build(), lanemap).build()?;
        let mut device = HostDevice::new(Crawl, 3);
        let mut obs = SnapshotObserver::new(CsvWriter::new(dir.path()).unwrap());
        sim.run(&mut device, &mut obs)?;
        Ok(obs)
    }

    #[test]
    fn checkpoints_become_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut obs = run_into(&dir).unwrap();
        assert_eq!(obs.written(), 3);
        assert!(obs.take_error().is_none());
        for t in ["2", "4", "6"] {
            assert!(dir.path().join(format!("edge_data_{t}.csv")).exists());
            assert!(dir.path().join(format!("agents_data_{t}.csv")).exists());
        }

        let mut rdr = csv::Reader::from_path(dir.path().join("edge_data_2.csv")).unwrap();
        let first: Vec<String> = rdr.records().next().unwrap().unwrap().iter().map(str::to_owned).collect();
        // eid 0: one entry, one exit after 3 steps of 1 s.
        assert_eq!(first, ["0", "0", "1", "1", "1", "3"]);

        let mut rdr = csv::Reader::from_path(dir.path().join("agents_data_6.csv")).unwrap();
        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(&rows[0][6], "6");
        assert_eq!(&rows[0][7], "2");
        // Unrouted agent never stepped.
        assert_eq!(&rows[1][7], "");
    }

    #[test]
    fn existing_snapshot_aborts_run() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("edge_data_4.csv"), "").unwrap();
        let err = run_into(&dir).err().unwrap();
        assert!(matches!(err, SimError::Observer { time, .. } if time == 4.0));
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use tempfile::TempDir;

    use super::fixtures::{agent_row, edge_row};
    use crate::sqlite::SqliteWriter;
    use crate::writer::SnapshotWriter;
    use crate::OutputError;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("snapshots.db").exists());
    }

    #[test]
    fn row_counts() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_checkpoint(1.0, &[edge_row(1.0, 0), edge_row(1.0, 1)], &[agent_row(1.0, 0, None)]).unwrap();
        w.write_checkpoint(2.0, &[edge_row(2.0, 0), edge_row(2.0, 1)], &[agent_row(2.0, 0, None)]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("snapshots.db")).unwrap();
        let edges: i64 = conn.query_row("SELECT COUNT(*) FROM edge_snapshots", [], |r| r.get(0)).unwrap();
        let agents: i64 = conn.query_row("SELECT COUNT(*) FROM agent_snapshots", [], |r| r.get(0)).unwrap();
        assert_eq!(edges, 4);
        assert_eq!(agents, 2);
    }

    #[test]
    fn undefined_speed_is_null() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_checkpoint(1.0, &[], &[agent_row(1.0, 0, None), agent_row(1.0, 1, Some(3.0))]).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("snapshots.db")).unwrap();
        let speeds: Vec<Option<f64>> = conn
            .prepare("SELECT average_speed FROM agent_snapshots ORDER BY agent_id")
            .unwrap()
            .query_map([], |r| r.get(0))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(speeds, [None, Some(3.0)]);
    }

    #[test]
    fn rejects_repeated_checkpoint() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.write_checkpoint(5.0, &[edge_row(5.0, 0)], &[]).unwrap();
        let err = w.write_checkpoint(5.0, &[edge_row(5.0, 0)], &[]).unwrap_err();
        assert!(matches!(err, OutputError::CheckpointExists { .. }));
        assert!(matches!(w.write_checkpoint(4.0, &[], &[]), Err(OutputError::CheckpointExists { .. })));
    }

    #[test]
    fn reopened_database_stays_append_only() {
        let dir = tmp();
        {
            let mut w = SqliteWriter::new(dir.path()).unwrap();
            w.write_checkpoint(5.0, &[], &[agent_row(5.0, 0, None)]).unwrap();
            w.finish().unwrap();
        }
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        assert!(w.write_checkpoint(5.0, &[], &[]).is_err());
        w.write_checkpoint(6.0, &[], &[agent_row(6.0, 0, None)]).unwrap();
    }
}

// ── Parquet tests ─────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "parquet"))]
mod parquet_tests {
    use tempfile::TempDir;

    use arrow::array::{Array, Float64Array};
    use arrow::datatypes::DataType;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    use super::fixtures::{agent_row, edge_row};
    use crate::parquet::ParquetWriter;
    use crate::writer::SnapshotWriter;
    use crate::OutputError;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn files_created() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert!(dir.path().join("edge_snapshots.parquet").exists());
        assert!(dir.path().join("agent_snapshots.parquet").exists());
    }

    #[test]
    fn checkpoints_appended() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.write_checkpoint(1.0, &[edge_row(1.0, 0), edge_row(1.0, 1)], &[]).unwrap();
        w.write_checkpoint(2.0, &[edge_row(2.0, 0), edge_row(2.0, 1)], &[]).unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("edge_snapshots.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        let schema = builder.schema().clone();
        let total: usize = builder.build().unwrap().map(|b| b.unwrap().num_rows()).sum();
        assert_eq!(total, 4);

        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, ["time", "eid", "u", "v", "upstream_count", "downstream_count", "average_travel_time"]);
    }

    #[test]
    fn undefined_speed_is_null() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.write_checkpoint(1.0, &[], &[agent_row(1.0, 0, None), agent_row(1.0, 1, Some(2.5))]).unwrap();
        w.finish().unwrap();

        let file = std::fs::File::open(dir.path().join("agent_snapshots.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        assert_eq!(*builder.schema().field_with_name("average_speed").unwrap().data_type(), DataType::Float64);
        let batch = builder.build().unwrap().next().unwrap().unwrap();
        let speed = batch
            .column_by_name("average_speed")
            .unwrap()
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert!(speed.is_null(0));
        assert_eq!(speed.value(1), 2.5);
    }

    fn edge_rows_on_disk(dir: &std::path::Path) -> usize {
        let file = std::fs::File::open(dir.join("edge_snapshots.parquet")).unwrap();
        let builder = ParquetRecordBatchReaderBuilder::try_new(file).unwrap();
        builder.build().unwrap().map(|b| b.unwrap().num_rows()).sum()
    }

    #[test]
    fn existing_files_are_not_truncated() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.write_checkpoint(1.0, &[edge_row(1.0, 0)], &[]).unwrap();
        w.finish().unwrap();

        let err = ParquetWriter::new(dir.path()).err().unwrap();
        assert!(matches!(err, OutputError::SnapshotExists(ref p) if p.ends_with("edge_snapshots.parquet")));
        assert_eq!(edge_rows_on_disk(dir.path()), 1);
    }

    #[test]
    fn lone_agent_file_blocks_creation() {
        let dir = tmp();
        std::fs::write(dir.path().join("agent_snapshots.parquet"), b"").unwrap();
        let err = ParquetWriter::new(dir.path()).err().unwrap();
        assert!(matches!(err, OutputError::SnapshotExists(ref p) if p.ends_with("agent_snapshots.parquet")));
        assert!(!dir.path().join("edge_snapshots.parquet").exists());
    }

    #[test]
    fn write_after_finish_is_an_error() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.write_checkpoint(1.0, &[edge_row(1.0, 0)], &[]).unwrap();
        w.finish().unwrap();

        let err = w.write_checkpoint(2.0, &[edge_row(2.0, 0)], &[]).unwrap_err();
        assert!(matches!(err, OutputError::WriterClosed { time } if time == 2.0));
        assert_eq!(edge_rows_on_disk(dir.path()), 1);
        // finish stays idempotent.
        w.finish().unwrap();
    }

    #[test]
    fn rejects_repeated_checkpoint() {
        let dir = tmp();
        let mut w = ParquetWriter::new(dir.path()).unwrap();
        w.write_checkpoint(3.0, &[], &[]).unwrap();
        assert!(matches!(w.write_checkpoint(3.0, &[], &[]), Err(OutputError::CheckpointExists { .. })));
    }
}
