//! The `StepKernel` trait — the per-cell simulation logic plugged into
//! [`HostDevice`](crate::HostDevice).

use lc_agent::Agent;
use lc_core::AgentRng;
use lc_lanemap::{EdgeAggregate, Intersection};

use crate::Transition;

/// Read-only view of shared device state for one step.
pub struct StepContext<'a> {
    /// Simulated time at the start of the step.
    pub time:          f64,
    pub delta_time:    f64,
    /// Zero-based index of the step being computed.
    pub step:          u64,
    /// Edge aggregates as of the end of the previous step.
    pub edges:         &'a [EdgeAggregate],
    /// Lane cells as of the end of the previous step.
    pub lane_cells:    &'a [u8],
    /// Intersections: previous-step values during the intersection phase,
    /// current-step values during the agent phase.
    pub intersections: &'a [Intersection],
}

/// Car-following, lane-changing, and intersection control.
///
/// # Thread safety
///
/// The device may call both methods for many records in parallel, so
/// implementations must be `Send + Sync`.  Anything that varies per agent
/// lives in the [`Agent`] record, not in the kernel.
pub trait StepKernel: Send + Sync {
    /// Update one intersection.  Runs before the agent phase.
    ///
    /// Default: leaves the intersection unchanged.
    fn step_intersection(&self, _ctx: &StepContext<'_>, _intersection: &mut Intersection) {}

    /// Update one agent's own record and return the shared-state writes it
    /// wants applied after the barrier.
    fn step_agent(
        &self,
        ctx:   &StepContext<'_>,
        agent: &mut Agent,
        rng:   &mut AgentRng,
    ) -> Vec<Transition>;
}

/// A [`StepKernel`] that never changes anything.  Useful for exercising the
/// driver without a traffic model.
pub struct NoopKernel;

impl StepKernel for NoopKernel {
    fn step_agent(&self, _ctx: &StepContext<'_>, _agent: &mut Agent, _rng: &mut AgentRng) -> Vec<Transition> {
        vec![]
    }
}
