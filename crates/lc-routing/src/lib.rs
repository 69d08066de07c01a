//! `lc-routing` — turn origin/destination pairs into merged-edge routes.
//!
//! # Pipeline
//!
//! ```text
//! AgentSet ──(origins, targets)──▶ RoutingIndex::batch_routes
//!                                        │ one vertex path per agent
//!                                        ▼
//!           consecutive (u, v) ──▶ Network::edge_id ──▶ IdMapping::mid
//!                                        │
//!                                        ▼
//!                              agent.route (bounded)
//! ```
//!
//! Runs once, synchronously, before the simulation loop.

pub mod assigner;
pub mod error;


pub use assigner::{AssignmentReport, LONG_ROUTE_EDGES, PathOutcome, RouteAssigner, RouteWarning};
pub use error::{AssignError, AssignResult};
