//! Bounded route storage.

use lc_core::MergedEdgeId;

use crate::{AgentError, AgentResult};

/// Route capacity used when the caller does not pick one.
pub const DEFAULT_ROUTE_CAPACITY: usize = 300;

/// Ordered merged-edge route with a hard capacity fixed at construction.
///
/// The backing storage is allocated once; [`push`](Self::push) never grows
/// it and fails instead of writing past the end.
///
/// ```
/// use lc_agent::RouteBuffer;
/// use lc_core::MergedEdgeId;
///
/// let mut route = RouteBuffer::with_capacity(2);
/// route.push(MergedEdgeId(10)).unwrap();
/// route.push(MergedEdgeId(11)).unwrap();
/// assert!(route.push(MergedEdgeId(12)).is_err());
/// assert_eq!(route.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteBuffer {
    edges:    Vec<MergedEdgeId>,
    capacity: usize,
}

impl RouteBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { edges: Vec::with_capacity(capacity), capacity }
    }

    /// Append `mid`, or fail with `RouteCapacityExceeded` if the buffer is full.
    pub fn push(&mut self, mid: MergedEdgeId) -> AgentResult<()> {
        if self.edges.len() >= self.capacity {
            return Err(AgentError::RouteCapacityExceeded { mid, capacity: self.capacity });
        }
        self.edges.push(mid);
        Ok(())
    }

    /// Drop all entries; capacity is unchanged.
    pub fn clear(&mut self) {
        self.edges.clear();
    }

    /// Current route length (`route_size`).
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity - self.edges.len()
    }

    #[inline]
    pub fn get(&self, i: usize) -> Option<MergedEdgeId> {
        self.edges.get(i).copied()
    }

    #[inline]
    pub fn as_slice(&self) -> &[MergedEdgeId] {
        &self.edges
    }
}

impl Default for RouteBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_ROUTE_CAPACITY)
    }
}
