//! `lc-lanemap` — the lane-level view of the road network.
//!
//! The stepping kernel does not work on routing-graph edges.  It works on
//! **merged edges** (one record per lane bundle) backed by a flat array of
//! lane cells.  This crate owns that representation and the explicit table
//! translating between the two edge id spaces.
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`mapping`]   | `IdMapping`: bidirectional `EdgeId ↔ MergedEdgeId`      |
//! | [`records`]   | `EdgeAggregate`, `Intersection`, `EMPTY_CELL`           |
//! | [`lanemap`]   | `Lanemap`, `LanemapBuilder`                             |
//! | [`error`]     | `LanemapError`, `LanemapResult<T>`                      |

pub mod error;
pub mod lanemap;
pub mod mapping;
pub mod records;


pub use error::{LanemapError, LanemapResult};
pub use lanemap::{Lanemap, LanemapBuilder, MID_SLACK};
pub use mapping::IdMapping;
pub use records::{EMPTY_CELL, EdgeAggregate, Intersection};
