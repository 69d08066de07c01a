//! `lc-network` — routing graph and shortest-path index.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`network`] | `Network` (CSR + `(u, v) → EdgeId` lookup), `NetworkBuilder` |
//! | [`index`]   | `RoutingIndex` trait, `DijkstraIndex`                       |
//! | [`error`]   | `NetworkError`, `NetworkResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | `DijkstraIndex::batch_routes` runs on Rayon.             |
//! | `serde`    | Derives `Serialize`/`Deserialize` on id types.           |

pub mod error;
pub mod index;
pub mod network;


pub use error::{NetworkError, NetworkResult};
pub use index::{DijkstraIndex, RoutingIndex};
pub use network::{Network, NetworkBuilder};
