//! Plain data row types written by output backends.

/// One merged edge at one checkpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSnapshotRow {
    /// Simulated time of the checkpoint (seconds).
    pub time:                f64,
    /// Graph edge id the merged edge maps back to.
    pub eid:                 u32,
    pub u:                   u32,
    pub v:                   u32,
    pub upstream_count:      u32,
    pub downstream_count:    u32,
    /// Seconds; [`NO_TRAVEL_TIME`](crate::NO_TRAVEL_TIME) when nothing left
    /// the edge this period.
    pub average_travel_time: f64,
}

/// One agent at one checkpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshotRow {
    pub time:            f64,
    pub agent_id:        u32,
    pub origin:          u32,
    pub destination:     u32,
    pub agent_type:      u8,
    /// [`AgentStatus`](lc_agent::AgentStatus) code.
    pub status:          u8,
    pub travel_dist_m:   f64,
    pub travel_time_s:   f64,
    /// `None` until the agent has taken a step.
    pub average_speed:   Option<f64>,
    pub num_slowdown:    u32,
    pub num_lane_change: u32,
    pub num_in_queue:    u32,
}
