//! The per-agent record.

use lc_core::{AgentId, VertexId};

use crate::RouteBuffer;

/// Lifecycle flag written to snapshots as its integer code.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum AgentStatus {
    /// Not yet departed, or never able to depart (no route).
    #[default]
    Pending  = 0,
    /// Currently on the network.
    Active   = 1,
    /// Trip completed.
    Finished = 2,
}

impl AgentStatus {
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Running statistics, mutated by the step kernel every step.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentStats {
    /// Cumulative distance travelled (metres).
    pub cum_length_m:       f64,
    /// Sum of per-step speeds (m/s); divide by `num_steps` for the mean.
    pub cum_speed:          f64,
    /// Steps spent active on the network.
    pub num_steps:          u32,
    pub slow_down_steps:    u32,
    pub num_lane_change:    u32,
    pub num_steps_in_queue: u32,
}

impl AgentStats {
    /// Mean speed in m/s, or `None` before the first active step.
    pub fn average_speed(&self) -> Option<f64> {
        (self.num_steps > 0).then(|| self.cum_speed / self.num_steps as f64)
    }
}

/// One member of the population.
///
/// `id`, `origin`, `destination` and `agent_type` are fixed at creation.
/// `route` is written once by route assignment.  Everything else belongs to
/// the step kernel.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    pub id:          AgentId,
    pub origin:      VertexId,
    pub destination: VertexId,
    pub agent_type:  u8,
    pub status:      AgentStatus,
    pub route:       RouteBuffer,
    pub stats:       AgentStats,

    // ── Kernel-owned kinematic state ──────────────────────────────────────
    /// Index into `route` of the edge currently occupied.
    pub route_index:     u32,
    /// Distance from the start of the current edge (metres).
    pub edge_position_m: f32,
    pub speed_mps:       f32,
    pub lane:            u8,
    /// Step at which the agent entered its current edge.
    pub edge_entry_step: u64,
}

impl Agent {
    pub fn new(
        id:             AgentId,
        origin:         VertexId,
        destination:    VertexId,
        agent_type:     u8,
        route_capacity: usize,
    ) -> Self {
        Self {
            id,
            origin,
            destination,
            agent_type,
            status:          AgentStatus::Pending,
            route:           RouteBuffer::with_capacity(route_capacity),
            stats:           AgentStats::default(),
            route_index:     0,
            edge_position_m: 0.0,
            speed_mps:       0.0,
            lane:            0,
            edge_entry_step: 0,
        }
    }

    /// Shorthand for `route.len()`.
    #[inline]
    pub fn route_size(&self) -> usize {
        self.route.len()
    }
}
