//! Synthetic street grid.
//!
//! `SIDE × SIDE` intersections, row-major, with two-way streets between
//! horizontal and vertical neighbours.  Every block is `BLOCK_M` long;
//! the arterial row (`ARTERIAL_ROW`) is faster than the side streets.

use lc_core::VertexId;
use lc_network::{Network, NetworkBuilder, NetworkResult};

pub const BLOCK_M: f32 = 120.0;
pub const ARTERIAL_ROW: u32 = 0;

/// ~50 km/h on the arterial, ~30 km/h elsewhere.
const ARTERIAL_MPS: f64 = 13.9;
const STREET_MPS:   f64 = 8.3;

pub fn vertex(side: u32, row: u32, col: u32) -> VertexId {
    VertexId(row * side + col)
}

/// Build the grid; routing weights are free-flow travel times in seconds.
pub fn build_grid(side: u32) -> NetworkResult<Network> {
    let mut b = NetworkBuilder::with_capacity((side * side) as usize, (4 * side * side) as usize);

    for row in 0..side {
        let speed = if row == ARTERIAL_ROW { ARTERIAL_MPS } else { STREET_MPS };
        for col in 0..side.saturating_sub(1) {
            b.add_road(vertex(side, row, col), vertex(side, row, col + 1), BLOCK_M as f64 / speed, BLOCK_M);
        }
    }
    for col in 0..side {
        for row in 0..side.saturating_sub(1) {
            b.add_road(vertex(side, row, col), vertex(side, row + 1, col), BLOCK_M as f64 / STREET_MPS, BLOCK_M);
        }
    }
    b.build()
}
