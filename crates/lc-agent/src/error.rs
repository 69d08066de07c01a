use lc_core::MergedEdgeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("route buffer full: cannot append {mid}, capacity is {capacity}")]
    RouteCapacityExceeded { mid: MergedEdgeId, capacity: usize },
}

pub type AgentResult<T> = Result<T, AgentError>;
