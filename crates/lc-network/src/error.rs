//! Network-subsystem error type.

use thiserror::Error;

use lc_core::VertexId;

/// Errors produced by `lc-network`.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("edge {from} -> {to} references a vertex outside 0..{vertex_count}")]
    VertexOutOfRange { from: VertexId, to: VertexId, vertex_count: usize },

    #[error("duplicate edge {from} -> {to}")]
    DuplicateEdge { from: VertexId, to: VertexId },

    #[error("edge {from} -> {to} has invalid weight {weight}")]
    InvalidWeight { from: VertexId, to: VertexId, weight: f64 },

    #[error("batch query has {sources} sources but {targets} targets")]
    BatchLengthMismatch { sources: usize, targets: usize },
}

pub type NetworkResult<T> = Result<T, NetworkError>;
