//! `lc-output` — checkpoint snapshot writers.
//!
//! Every checkpoint produces two record sets, one row per merged edge and
//! one row per agent, tagged with the simulated time.  Backends are
//! selected by Cargo feature:
//!
//! | Feature   | Backend     | Files created                                             |
//! |-----------|-------------|-----------------------------------------------------------|
//! | *(none)*  | CSV         | `edge_data_<t>.csv`, `agents_data_<t>.csv` per checkpoint |
//! | `sqlite`  | SQLite      | `snapshots.db`                                            |
//! | `parquet` | Parquet     | `edge_snapshots.parquet`, `agent_snapshots.parquet`       |
//!
//! All backends implement [`SnapshotWriter`] and are driven by
//! [`SnapshotObserver`], which implements `lc_sim::SimObserver`.
//! Snapshots are append-only: writing a checkpoint whose time is already on
//! disk is an error, never an overwrite.
//!
//! # Usage
//!
//! ```rust,ignore
//! use lc_output::{CsvWriter, SnapshotObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SnapshotObserver::new(writer);
//! sim.run(&mut device, &mut obs)?;
//! if let Some(e) = obs.take_error() { eprintln!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod snapshot;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SnapshotObserver;
pub use row::{AgentSnapshotRow, EdgeSnapshotRow};
pub use snapshot::{NO_TRAVEL_TIME, average_travel_time, build_agent_rows, build_edge_rows};
pub use writer::SnapshotWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;
