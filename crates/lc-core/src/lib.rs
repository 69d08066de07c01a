//! `lc-core` — foundational types for the lane-level traffic simulator.
//!
//! This crate is a dependency of every other `lc-*` crate.  It has no `lc-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`ids`]     | `AgentId`, `VertexId`, `EdgeId`, `MergedEdgeId`            |
//! | [`time`]    | `SimClock`, `SimConfig`                                    |
//! | [`rng`]     | `AgentRng` (per-agent, deterministic)                      |
//! | [`error`]   | `CoreError`, `CoreResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{AgentId, EdgeId, MergedEdgeId, VertexId};
pub use rng::{AgentRng, agent_seed};
pub use time::{SimClock, SimConfig};
