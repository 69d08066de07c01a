//! Building snapshot rows from host copies of simulation state.

use lc_agent::AgentSet;
use lc_lanemap::Lanemap;

use crate::{AgentSnapshotRow, EdgeSnapshotRow, OutputError, OutputResult};

/// Average travel time written for edges nobody has left yet.
pub const NO_TRAVEL_TIME: f64 = -1.0;

/// `(cum_travel_steps / downstream_count) * delta_time`, or
/// [`NO_TRAVEL_TIME`] when `downstream_count == 0`.
pub fn average_travel_time(cum_travel_steps: u64, downstream_count: u32, delta_time: f64) -> f64 {
    if downstream_count == 0 {
        return NO_TRAVEL_TIME;
    }
    cum_travel_steps as f64 / downstream_count as f64 * delta_time
}

/// One row per mapped merged edge, in ascending-mid order.
pub fn build_edge_rows(lanemap: &Lanemap, time: f64, delta_time: f64) -> OutputResult<Vec<EdgeSnapshotRow>> {
    lanemap
        .mapping()
        .iter_mid_to_eid()
        .map(|(mid, eid)| {
            let edge = lanemap.aggregate(mid).ok_or(OutputError::MissingAggregate { mid, eid })?;
            Ok(EdgeSnapshotRow {
                time,
                eid:                 eid.0,
                u:                   edge.vertices[0].0,
                v:                   edge.vertices[1].0,
                upstream_count:      edge.upstream_count,
                downstream_count:    edge.downstream_count,
                average_travel_time: average_travel_time(
                    edge.period_cum_travel_steps,
                    edge.downstream_count,
                    delta_time,
                ),
            })
        })
        .collect()
}

/// One row per agent, in population order.
pub fn build_agent_rows(agents: &AgentSet, time: f64, delta_time: f64) -> Vec<AgentSnapshotRow> {
    agents
        .iter()
        .map(|a| AgentSnapshotRow {
            time,
            agent_id:        a.id.0,
            origin:          a.origin.0,
            destination:     a.destination.0,
            agent_type:      a.agent_type,
            status:          a.status.code(),
            travel_dist_m:   a.stats.cum_length_m,
            travel_time_s:   a.stats.num_steps as f64 * delta_time,
            average_speed:   a.stats.average_speed(),
            num_slowdown:    a.stats.slow_down_steps,
            num_lane_change: a.stats.num_lane_change,
            num_in_queue:    a.stats.num_steps_in_queue,
        })
        .collect()
}
