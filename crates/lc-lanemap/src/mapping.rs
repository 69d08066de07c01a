//! The explicit graph-edge ↔ merged-edge lookup table.

use std::collections::BTreeMap;

use lc_core::{EdgeId, MergedEdgeId};

use crate::{LanemapError, LanemapResult};

/// Bijection between the graph edges that have a lane representation and
/// their merged edges.
///
/// Built once and immutable afterwards.  Both directions are ordered maps so
/// that enumeration order is stable (ascending id).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdMapping {
    eid_to_mid: BTreeMap<EdgeId, MergedEdgeId>,
    mid_to_eid: BTreeMap<MergedEdgeId, EdgeId>,
}

impl IdMapping {
    /// Build from `(eid, mid)` pairs, rejecting any id that appears twice on
    /// either side.
    pub fn from_pairs<I>(pairs: I) -> LanemapResult<Self>
    where
        I: IntoIterator<Item = (EdgeId, MergedEdgeId)>,
    {
        let mut mapping = Self::default();
        for (eid, mid) in pairs {
            if mapping.eid_to_mid.insert(eid, mid).is_some() {
                return Err(LanemapError::DuplicateEid(eid));
            }
            if mapping.mid_to_eid.insert(mid, eid).is_some() {
                return Err(LanemapError::DuplicateMid(mid));
            }
        }
        Ok(mapping)
    }

    #[inline]
    pub fn mid(&self, eid: EdgeId) -> Option<MergedEdgeId> {
        self.eid_to_mid.get(&eid).copied()
    }

    #[inline]
    pub fn eid(&self, mid: MergedEdgeId) -> Option<EdgeId> {
        self.mid_to_eid.get(&mid).copied()
    }

    pub fn eid_to_mid(&self) -> &BTreeMap<EdgeId, MergedEdgeId> {
        &self.eid_to_mid
    }

    pub fn mid_to_eid(&self) -> &BTreeMap<MergedEdgeId, EdgeId> {
        &self.mid_to_eid
    }

    /// `(mid, eid)` in ascending `mid` order.
    pub fn iter_mid_to_eid(&self) -> impl Iterator<Item = (MergedEdgeId, EdgeId)> + '_ {
        self.mid_to_eid.iter().map(|(&m, &e)| (m, e))
    }

    pub fn len(&self) -> usize {
        self.mid_to_eid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mid_to_eid.is_empty()
    }

    /// One past the largest merged edge id, i.e. the length a dense
    /// mid-indexed array must have.
    pub fn mid_span(&self) -> usize {
        self.mid_to_eid
            .last_key_value()
            .map_or(0, |(mid, _)| mid.index() + 1)
    }
}
