//! Device-uploadable records.

use lc_core::VertexId;

/// Lane cell value meaning "no vehicle".
pub const EMPTY_CELL: u8 = 0xFF;

/// Per-merged-edge aggregate, updated by the device every step.
///
/// Counter reset between periods is the kernel's business; the host only
/// reads these at checkpoints.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeAggregate {
    /// `[u, v]` endpoints of the underlying graph edge.
    pub vertices:                [VertexId; 2],
    pub length_m:                f32,
    pub num_lanes:               u8,
    /// Index of this edge's first cell in the lane-cell array.
    pub lane_offset:             u32,
    /// Vehicles that entered the edge this period.
    pub upstream_count:          u32,
    /// Vehicles that left the edge this period.
    pub downstream_count:        u32,
    /// Sum over leaving vehicles of the steps they spent on the edge.
    pub period_cum_travel_steps: u64,
}

impl EdgeAggregate {
    /// Cells per lane: one per metre, rounded up, never zero.
    #[inline]
    pub fn cells_per_lane(&self) -> u32 {
        (self.length_m.max(0.0).ceil() as u32).max(1)
    }

    #[inline]
    pub fn cell_count(&self) -> u32 {
        self.cells_per_lane() * self.num_lanes as u32
    }

    /// Clear the per-period counters.
    pub fn reset_period(&mut self) {
        self.upstream_count = 0;
        self.downstream_count = 0;
        self.period_cum_travel_steps = 0;
    }
}

/// Per-intersection control record, owned by the kernel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Intersection {
    pub vertex:           VertexId,
    /// Kernel-defined control state (e.g. current signal phase).
    pub state:            u32,
    /// Step at which `state` last changed.
    pub last_change_step: u64,
}
