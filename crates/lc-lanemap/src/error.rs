use lc_core::{EdgeId, MergedEdgeId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LanemapError {
    #[error("graph edge {0} is mapped to more than one merged edge")]
    DuplicateEid(EdgeId),

    #[error("merged edge {0} is mapped from more than one graph edge")]
    DuplicateMid(MergedEdgeId),

    #[error("merged edge ids span {span} slots for {mapped} mapped edges; ids must be close to dense")]
    SparseMids { span: usize, mapped: usize },

    #[error("merged edge {mid} has {num_lanes} lanes; at least one is required")]
    NoLanes { mid: MergedEdgeId, num_lanes: u8 },
}

pub type LanemapResult<T> = Result<T, LanemapError>;
