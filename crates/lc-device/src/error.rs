use lc_core::AgentId;
use thiserror::Error;

use crate::Transition;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("device is already initialized")]
    AlreadyInitialized,

    #[error("device is not initialized")]
    NotInitialized,

    #[error("{what}: device holds {expected} entries, caller passed {got}")]
    ShapeMismatch { what: &'static str, expected: usize, got: usize },

    #[error("launch of {grid_size} blocks × {block_size} threads cannot cover {agent_count} agents")]
    LaunchConfig { grid_size: u32, block_size: u32, agent_count: usize },

    #[error("{agent} emitted an out-of-range transition {transition:?}")]
    InvalidTransition { agent: AgentId, transition: Transition },

    #[error("device backend failure: {0}")]
    Backend(String),
}

pub type DeviceResult<T> = Result<T, DeviceError>;
