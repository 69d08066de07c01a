//! Batch shortest-path index and the default Dijkstra implementation.
//!
//! # Pluggability
//!
//! Route assignment talks to the index only through [`RoutingIndex`], so a
//! contraction-hierarchy engine (or any other many-to-many solver) can be
//! swapped in without touching the assigner.  [`DijkstraIndex`] is the
//! reference implementation used by the demo and the tests.
//!
//! # Result convention
//!
//! Each query answers with the ordered **vertex** sequence of the path:
//!
//! | Case                         | Result              |
//! |------------------------------|---------------------|
//! | path found                   | `[origin, …, dest]` |
//! | `origin == destination`      | `[origin]`          |
//! | unreachable / unknown vertex | `[]`                |

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use lc_core::VertexId;

use crate::{Network, NetworkError, NetworkResult};

// ── RoutingIndex trait ────────────────────────────────────────────────────────

/// Many-to-many shortest-path engine, built once from a [`Network`].
///
/// Implementations must be `Send + Sync`; the index is immutable after
/// construction and may answer queries from several threads.
pub trait RoutingIndex: Send + Sync {
    /// Answer one query per `(sources[i], targets[i])` pair, in input order.
    ///
    /// Fails only when the two slices differ in length.
    fn batch_routes(
        &self,
        sources: &[VertexId],
        targets: &[VertexId],
    ) -> NetworkResult<Vec<Vec<VertexId>>>;
}

// ── DijkstraIndex ─────────────────────────────────────────────────────────────

/// Dijkstra over a snapshot of the network's weighted CSR adjacency.
///
/// Ties between equal-cost labels are broken by vertex id, so results are
/// deterministic.
pub struct DijkstraIndex {
    out_start: Vec<u32>,
    targets:   Vec<VertexId>,
    weights:   Vec<f64>,
}

impl DijkstraIndex {
    /// Snapshot `network`'s vertex count, edge list, and weights.
    pub fn build(network: &Network) -> Self {
        let n = network.vertex_count();
        let mut out_start = Vec::with_capacity(n + 1);
        let mut targets   = Vec::with_capacity(network.edge_count());
        let mut weights   = Vec::with_capacity(network.edge_count());

        out_start.push(0);
        for v in 0..n as u32 {
            for &edge in network.out_edges(VertexId(v)) {
                targets.push(network.edge_to[edge.index()]);
                weights.push(network.edge_weight[edge.index()]);
            }
            out_start.push(targets.len() as u32);
        }

        Self { out_start, targets, weights }
    }

    pub fn vertex_count(&self) -> usize {
        self.out_start.len() - 1
    }

    /// Single-pair query following the result convention above.
    pub fn route(&self, from: VertexId, to: VertexId) -> Vec<VertexId> {
        let n = self.vertex_count();
        if from.index() >= n || to.index() >= n {
            return vec![];
        }
        if from == to {
            return vec![from];
        }

        let mut dist = vec![f64::INFINITY; n];
        let mut prev = vec![VertexId::INVALID; n];
        let mut heap = BinaryHeap::new();

        dist[from.index()] = 0.0;
        heap.push(Label { cost: 0.0, vertex: from });

        while let Some(Label { cost, vertex }) = heap.pop() {
            if vertex == to {
                return reconstruct(&prev, from, to);
            }
            // Skip stale heap entries.
            if cost > dist[vertex.index()] {
                continue;
            }
            let start = self.out_start[vertex.index()] as usize;
            let end   = self.out_start[vertex.index() + 1] as usize;
            for i in start..end {
                let next = self.targets[i];
                let new_cost = cost + self.weights[i];
                if new_cost < dist[next.index()] {
                    dist[next.index()] = new_cost;
                    prev[next.index()] = vertex;
                    heap.push(Label { cost: new_cost, vertex: next });
                }
            }
        }

        vec![]
    }
}

impl RoutingIndex for DijkstraIndex {
    fn batch_routes(
        &self,
        sources: &[VertexId],
        targets: &[VertexId],
    ) -> NetworkResult<Vec<Vec<VertexId>>> {
        if sources.len() != targets.len() {
            return Err(NetworkError::BatchLengthMismatch {
                sources: sources.len(),
                targets: targets.len(),
            });
        }

        #[cfg(not(feature = "parallel"))]
        {
            Ok(sources
                .iter()
                .zip(targets)
                .map(|(&s, &t)| self.route(s, t))
                .collect())
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            Ok(sources
                .par_iter()
                .zip(targets.par_iter())
                .map(|(&s, &t)| self.route(s, t))
                .collect())
        }
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Heap entry ordered so that `BinaryHeap` (a max-heap) pops the cheapest
/// label first, lowest vertex id on ties.
#[derive(Copy, Clone, PartialEq)]
struct Label {
    cost:   f64,
    vertex: VertexId,
}

impl Eq for Label {}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn reconstruct(prev: &[VertexId], from: VertexId, to: VertexId) -> Vec<VertexId> {
    let mut path = vec![to];
    let mut cur = to;
    while cur != from {
        cur = prev[cur.index()];
        path.push(cur);
    }
    path.reverse();
    path
}
