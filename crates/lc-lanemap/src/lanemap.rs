//! `Lanemap` and its builder.

use lc_core::{EdgeId, MergedEdgeId, VertexId};
use lc_network::Network;

use crate::{EMPTY_CELL, EdgeAggregate, IdMapping, Intersection, LanemapError, LanemapResult};

/// Lane-level network: id mapping, mid-indexed edge aggregates, the flat
/// lane-cell array, and intersection records.
///
/// `edges` is dense and indexed by `MergedEdgeId`; slots whose mid is not in
/// the mapping hold a default record with `num_lanes == 0` and own no cells.
#[derive(Clone, Debug, Default)]
pub struct Lanemap {
    mapping:       IdMapping,
    edges:         Vec<EdgeAggregate>,
    lane_cells:    Vec<u8>,
    intersections: Vec<Intersection>,
}

impl Lanemap {
    /// One merged edge per graph edge (mid = eid), `lanes_per_edge` lanes
    /// each, one intersection per vertex.
    pub fn from_network(network: &Network, lanes_per_edge: u8) -> LanemapResult<Self> {
        let mut b = LanemapBuilder::new();
        for (i, (u, v, _)) in network.edges().enumerate() {
            let eid = EdgeId(i as u32);
            b.add_merged_edge(eid, MergedEdgeId(i as u32), [u, v], network.length_m(eid), lanes_per_edge);
        }
        for v in 0..network.vertex_count() as u32 {
            b.add_intersection(VertexId(v));
        }
        b.build()
    }

    pub fn mapping(&self) -> &IdMapping {
        &self.mapping
    }

    pub fn eid_to_mid(&self) -> &std::collections::BTreeMap<EdgeId, MergedEdgeId> {
        self.mapping.eid_to_mid()
    }

    pub fn mid_to_eid(&self) -> &std::collections::BTreeMap<MergedEdgeId, EdgeId> {
        self.mapping.mid_to_eid()
    }

    #[inline]
    pub fn aggregate(&self, mid: MergedEdgeId) -> Option<&EdgeAggregate> {
        self.edges.get(mid.index())
    }

    pub fn edge_aggregates(&self) -> &[EdgeAggregate] {
        &self.edges
    }

    pub fn edge_aggregates_mut(&mut self) -> &mut [EdgeAggregate] {
        &mut self.edges
    }

    pub fn lane_cells(&self) -> &[u8] {
        &self.lane_cells
    }

    pub fn lane_cells_mut(&mut self) -> &mut [u8] {
        &mut self.lane_cells
    }

    pub fn intersections(&self) -> &[Intersection] {
        &self.intersections
    }

    pub fn intersections_mut(&mut self) -> &mut [Intersection] {
        &mut self.intersections
    }

    /// Split borrow of the arrays refreshed by device retrieval.
    pub fn device_arrays_mut(&mut self) -> (&mut [EdgeAggregate], &mut [Intersection]) {
        (&mut self.edges, &mut self.intersections)
    }
}

/// Construct a [`Lanemap`] with explicit merged-edge ids.
///
/// ```
/// use lc_core::{EdgeId, MergedEdgeId, VertexId};
/// use lc_lanemap::LanemapBuilder;
///
/// let mut b = LanemapBuilder::new();
/// b.add_merged_edge(EdgeId(0), MergedEdgeId(10), [VertexId(0), VertexId(1)], 12.5, 2);
/// let lm = b.build().unwrap();
/// assert_eq!(lm.mapping().mid(EdgeId(0)), Some(MergedEdgeId(10)));
/// assert_eq!(lm.edge_aggregates().len(), 11);
/// assert_eq!(lm.lane_cells().len(), 26); // 13 cells × 2 lanes
/// ```
#[derive(Default)]
pub struct LanemapBuilder {
    merged:        Vec<(EdgeId, MergedEdgeId, EdgeAggregate)>,
    intersections: Vec<Intersection>,
}

/// Unmapped merged-edge slots tolerated on top of one hole per mapped edge.
pub const MID_SLACK: usize = 1_024;

impl LanemapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register graph edge `eid` as merged edge `mid`.
    ///
    /// Aggregates are stored densely by `mid`, so ids should run from 0 with
    /// few holes; [`build`](Self::build) rejects a span wider than
    /// `2 × mapped + MID_SLACK`.
    pub fn add_merged_edge(
        &mut self,
        eid:       EdgeId,
        mid:       MergedEdgeId,
        vertices:  [VertexId; 2],
        length_m:  f32,
        num_lanes: u8,
    ) {
        let record = EdgeAggregate { vertices, length_m, num_lanes, ..EdgeAggregate::default() };
        self.merged.push((eid, mid, record));
    }

    pub fn add_intersection(&mut self, vertex: VertexId) {
        self.intersections.push(Intersection { vertex, ..Intersection::default() });
    }

    /// Validate the mapping, lay out lane cells in ascending-mid order, and
    /// produce the [`Lanemap`].
    pub fn build(mut self) -> LanemapResult<Lanemap> {
        let mapping = IdMapping::from_pairs(self.merged.iter().map(|&(e, m, _)| (e, m)))?;
        let (span, mapped) = (mapping.mid_span(), self.merged.len());
        if span > mapped.saturating_mul(2).saturating_add(MID_SLACK) {
            return Err(LanemapError::SparseMids { span, mapped });
        }

        self.merged.sort_unstable_by_key(|&(_, mid, _)| mid);
        let mut edges = vec![EdgeAggregate::default(); mapping.mid_span()];
        let mut next_cell: u32 = 0;
        for (_, mid, mut record) in self.merged {
            if record.num_lanes == 0 {
                return Err(LanemapError::NoLanes { mid, num_lanes: 0 });
            }
            record.lane_offset = next_cell;
            next_cell += record.cell_count();
            edges[mid.index()] = record;
        }

        Ok(Lanemap {
            mapping,
            edges,
            lane_cells: vec![EMPTY_CELL; next_cell as usize],
            intersections: self.intersections,
        })
    }
}
