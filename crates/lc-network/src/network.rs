//! Routing network representation and builder.
//!
//! # Data layout
//!
//! Edge ids are assigned in insertion order, so an `EdgeId` handed out by
//! [`NetworkBuilder::add_edge`] stays valid after `build()`.  Outgoing
//! adjacency is stored separately in **Compressed Sparse Row (CSR)** form:
//!
//! ```text
//! out_edges[ out_start[v] .. out_start[v+1] ]
//! ```
//!
//! lists the `EdgeId`s leaving vertex `v`.  A hash index maps an ordered
//! vertex pair to its edge id for O(1) path-to-edge resolution.

use rustc_hash::FxHashMap;

use lc_core::{EdgeId, VertexId};

use crate::{NetworkError, NetworkResult};

// ── Network ───────────────────────────────────────────────────────────────────

/// Directed, weighted routing graph over intersections.
///
/// Immutable once built.  Construct with [`NetworkBuilder`].
#[derive(Debug, Clone)]
pub struct Network {
    vertex_count: usize,

    // ── Edge data (indexed by EdgeId = insertion order) ───────────────────
    /// Source vertex of each edge.
    pub edge_from: Vec<VertexId>,
    /// Destination vertex of each edge.
    pub edge_to: Vec<VertexId>,
    /// Routing cost of each edge.
    pub edge_weight: Vec<f64>,
    /// Physical length of each edge in metres.
    pub edge_length_m: Vec<f32>,

    // ── CSR outgoing adjacency ────────────────────────────────────────────
    out_start: Vec<u32>,
    out_edges: Vec<EdgeId>,

    pair_index: FxHashMap<(VertexId, VertexId), EdgeId>,
}

impl Network {
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    /// Iterator over `(u, v, weight)` in `EdgeId` order.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId, f64)> + '_ {
        self.edge_from
            .iter()
            .zip(&self.edge_to)
            .zip(&self.edge_weight)
            .map(|((&u, &v), &w)| (u, v, w))
    }

    /// The edge id of the directed edge `u → v`, if one exists.
    #[inline]
    pub fn edge_id(&self, u: VertexId, v: VertexId) -> Option<EdgeId> {
        self.pair_index.get(&(u, v)).copied()
    }

    /// `(u, v)` of `edge`.
    #[inline]
    pub fn endpoints(&self, edge: EdgeId) -> (VertexId, VertexId) {
        (self.edge_from[edge.index()], self.edge_to[edge.index()])
    }

    #[inline]
    pub fn length_m(&self, edge: EdgeId) -> f32 {
        self.edge_length_m[edge.index()]
    }

    /// `EdgeId`s of all edges leaving `vertex`.
    #[inline]
    pub fn out_edges(&self, vertex: VertexId) -> &[EdgeId] {
        let start = self.out_start[vertex.index()] as usize;
        let end   = self.out_start[vertex.index() + 1] as usize;
        &self.out_edges[start..end]
    }
}

// ── NetworkBuilder ────────────────────────────────────────────────────────────

/// Construct a [`Network`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use lc_core::VertexId;
/// use lc_network::NetworkBuilder;
///
/// let mut b = NetworkBuilder::new(3);
/// let e = b.add_edge(VertexId(0), VertexId(1), 1.0, 100.0);
/// b.add_road(VertexId(1), VertexId(2), 2.0, 200.0);
/// let net = b.build().unwrap();
/// assert_eq!(net.edge_count(), 3);
/// assert_eq!(net.edge_id(VertexId(0), VertexId(1)), Some(e));
/// ```
pub struct NetworkBuilder {
    vertex_count: usize,
    raw_edges:    Vec<RawEdge>,
}

struct RawEdge {
    from:     VertexId,
    to:       VertexId,
    weight:   f64,
    length_m: f32,
}

impl NetworkBuilder {
    pub fn new(vertex_count: usize) -> Self {
        Self { vertex_count, raw_edges: Vec::new() }
    }

    pub fn with_capacity(vertex_count: usize, edges: usize) -> Self {
        Self { vertex_count, raw_edges: Vec::with_capacity(edges) }
    }

    /// Add a **directed** edge and return its id.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId, weight: f64, length_m: f32) -> EdgeId {
        let id = EdgeId(self.raw_edges.len() as u32);
        self.raw_edges.push(RawEdge { from, to, weight, length_m });
        id
    }

    /// Convenience: add edges in **both directions**.
    pub fn add_road(&mut self, a: VertexId, b: VertexId, weight: f64, length_m: f32) {
        self.add_edge(a, b, weight, length_m);
        self.add_edge(b, a, weight, length_m);
    }

    pub fn edge_count(&self) -> usize {
        self.raw_edges.len()
    }

    /// Validate the edge list and produce a [`Network`].
    ///
    /// Fails on out-of-range vertices, negative or non-finite weights, and
    /// repeated `(u, v)` pairs (the pair lookup must be a function).
    pub fn build(self) -> NetworkResult<Network> {
        let n = self.vertex_count;
        let mut pair_index = FxHashMap::default();
        pair_index.reserve(self.raw_edges.len());

        for (i, e) in self.raw_edges.iter().enumerate() {
            if e.from.index() >= n || e.to.index() >= n {
                return Err(NetworkError::VertexOutOfRange { from: e.from, to: e.to, vertex_count: n });
            }
            if !(e.weight.is_finite() && e.weight >= 0.0) {
                return Err(NetworkError::InvalidWeight { from: e.from, to: e.to, weight: e.weight });
            }
            if pair_index.insert((e.from, e.to), EdgeId(i as u32)).is_some() {
                return Err(NetworkError::DuplicateEdge { from: e.from, to: e.to });
            }
        }

        // CSR row pointer over outgoing edges.
        let mut out_start = vec![0u32; n + 1];
        for e in &self.raw_edges {
            out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=n {
            out_start[i] += out_start[i - 1];
        }
        let mut cursor: Vec<u32> = out_start[..n].to_vec();
        let mut out_edges = vec![EdgeId::INVALID; self.raw_edges.len()];
        for (i, e) in self.raw_edges.iter().enumerate() {
            let slot = &mut cursor[e.from.index()];
            out_edges[*slot as usize] = EdgeId(i as u32);
            *slot += 1;
        }

        Ok(Network {
            vertex_count:  n,
            edge_from:     self.raw_edges.iter().map(|e| e.from).collect(),
            edge_to:       self.raw_edges.iter().map(|e| e.to).collect(),
            edge_weight:   self.raw_edges.iter().map(|e| e.weight).collect(),
            edge_length_m: self.raw_edges.iter().map(|e| e.length_m).collect(),
            out_start,
            out_edges,
            pair_index,
        })
    }
}
