use lc_agent::AgentError;
use lc_core::{AgentId, EdgeId, VertexId};
use lc_network::NetworkError;
use thiserror::Error;

/// Fatal route-assignment failures.  A missing path is *not* one of them;
/// it is reported as a [`RouteWarning`](crate::RouteWarning).
#[derive(Debug, Error)]
pub enum AssignError {
    #[error("routing index failed: {0}")]
    Routing(#[from] NetworkError),

    #[error("routing index returned {got} paths for {expected} agents")]
    ResultCountMismatch { expected: usize, got: usize },

    #[error("{agent} needs {edges} edges but its route buffer holds {capacity}")]
    RouteCapacityExceeded { agent: AgentId, edges: usize, capacity: usize },

    #[error("path of {agent} steps {from} -> {to}, which is not a network edge")]
    MissingEdge { agent: AgentId, from: VertexId, to: VertexId },

    #[error("path of {agent} uses {eid}, which has no merged edge")]
    UnmappedEdge { agent: AgentId, eid: EdgeId },

    #[error(transparent)]
    Agent(#[from] AgentError),
}

pub type AssignResult<T> = Result<T, AssignError>;
