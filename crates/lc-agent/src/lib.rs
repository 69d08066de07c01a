//! `lc-agent` — agent records and the origin/destination population.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`route`]   | `RouteBuffer`: fixed-capacity, bounds-checked route       |
//! | [`agent`]   | `Agent`, `AgentStatus`, `AgentStats`                      |
//! | [`store`]   | `AgentSet`, `AgentSetBuilder`                             |
//! | [`error`]   | `AgentError`, `AgentResult<T>`                            |
//!
//! Agents are plain array-of-structs records: the whole `Vec<Agent>` is what
//! gets uploaded to the device and copied back at checkpoints.

pub mod agent;
pub mod error;
pub mod route;
pub mod store;


pub use agent::{Agent, AgentStats, AgentStatus};
pub use error::{AgentError, AgentResult};
pub use route::{DEFAULT_ROUTE_CAPACITY, RouteBuffer};
pub use store::{AgentSet, AgentSetBuilder};
