//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `snapshots.db` file in the output directory with two
//! tables, `edge_snapshots` and `agent_snapshots`, keyed by `(time, id)`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::SnapshotWriter;
use crate::{AgentSnapshotRow, EdgeSnapshotRow, OutputError, OutputResult};

/// Writes checkpoint snapshots to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `snapshots.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        if !dir.is_dir() {
            return Err(OutputError::MissingDirectory(dir.to_path_buf()));
        }
        let conn = Connection::open(dir.join("snapshots.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS edge_snapshots (
                 time                REAL    NOT NULL,
                 eid                 INTEGER NOT NULL,
                 u                   INTEGER NOT NULL,
                 v                   INTEGER NOT NULL,
                 upstream_count      INTEGER NOT NULL,
                 downstream_count    INTEGER NOT NULL,
                 average_travel_time REAL    NOT NULL,
                 PRIMARY KEY (time, eid)
             );
             CREATE TABLE IF NOT EXISTS agent_snapshots (
                 time            REAL    NOT NULL,
                 agent_id        INTEGER NOT NULL,
                 origin          INTEGER NOT NULL,
                 destination     INTEGER NOT NULL,
                 agent_type      INTEGER NOT NULL,
                 status          INTEGER NOT NULL,
                 travel_dist_m   REAL    NOT NULL,
                 travel_time_s   REAL    NOT NULL,
                 average_speed   REAL,
                 num_slowdown    INTEGER NOT NULL,
                 num_lane_change INTEGER NOT NULL,
                 num_in_queue    INTEGER NOT NULL,
                 PRIMARY KEY (time, agent_id)
             );",
        )?;

        Ok(Self { conn, finished: false })
    }

    /// Latest checkpoint time already stored, if any.
    fn last_time(&self) -> OutputResult<Option<f64>> {
        let last = self.conn.query_row(
            "SELECT MAX(t) FROM (SELECT time AS t FROM edge_snapshots \
             UNION ALL SELECT time FROM agent_snapshots)",
            [],
            |r| r.get::<_, Option<f64>>(0),
        )?;
        Ok(last)
    }
}

impl SnapshotWriter for SqliteWriter {
    fn write_checkpoint(
        &mut self,
        time:   f64,
        edges:  &[EdgeSnapshotRow],
        agents: &[AgentSnapshotRow],
    ) -> OutputResult<()> {
        if self.last_time()?.is_some_and(|last| time <= last) {
            return Err(OutputError::CheckpointExists { time });
        }

        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO edge_snapshots \
                 (time, eid, u, v, upstream_count, downstream_count, average_travel_time) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for row in edges {
                stmt.execute(rusqlite::params![
                    row.time,
                    row.eid,
                    row.u,
                    row.v,
                    row.upstream_count,
                    row.downstream_count,
                    row.average_travel_time,
                ])?;
            }

            let mut stmt = tx.prepare_cached(
                "INSERT INTO agent_snapshots \
                 (time, agent_id, origin, destination, agent_type, status, travel_dist_m, \
                  travel_time_s, average_speed, num_slowdown, num_lane_change, num_in_queue) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;
            for row in agents {
                stmt.execute(rusqlite::params![
                    row.time,
                    row.agent_id,
                    row.origin,
                    row.destination,
                    row.agent_type,
                    row.status,
                    row.travel_dist_m,
                    row.travel_time_s,
                    row.average_speed,
                    row.num_slowdown,
                    row.num_lane_change,
                    row.num_in_queue,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
