//! The device execution surface.

use lc_agent::Agent;
use lc_lanemap::{EdgeAggregate, Intersection};

use crate::DeviceResult;

/// Primitives a parallel compute device must provide.
///
/// Every call blocks until the device operation has completed.  The host
/// calls them strictly in the order `init`, `step`*, `retrieve`*, `finish`;
/// implementations should reject anything else with
/// [`DeviceError::NotInitialized`](crate::DeviceError::NotInitialized) or
/// [`DeviceError::AlreadyInitialized`](crate::DeviceError::AlreadyInitialized).
///
/// Prefer driving a device through [`DeviceSession`](crate::DeviceSession),
/// which guarantees `finish` runs.
pub trait DeviceSurface {
    /// Allocate device-resident state and upload the host arrays.
    ///
    /// `first_init` marks a fresh run: per-period edge counters start at zero.
    fn init(
        &mut self,
        first_init:    bool,
        agents:        &[Agent],
        edges:         &[EdgeAggregate],
        lane_cells:    &[u8],
        intersections: &[Intersection],
    ) -> DeviceResult<()>;

    /// Advance every agent and intersection by one step of `delta_time`
    /// starting at `current_time`.
    ///
    /// `grid_size × block_size` work units are launched; units past
    /// `agent_count` idle.
    fn step(
        &mut self,
        current_time:       f64,
        agent_count:        usize,
        intersection_count: usize,
        delta_time:         f64,
        grid_size:          u32,
        block_size:         u32,
    ) -> DeviceResult<()>;

    /// Copy the current agent, edge-aggregate, and intersection state into
    /// the host buffers.  Does not modify device state.
    fn retrieve(
        &self,
        agents:        &mut [Agent],
        edges:         &mut [EdgeAggregate],
        intersections: &mut [Intersection],
    ) -> DeviceResult<()>;

    /// Release all device-resident state.
    fn finish(&mut self) -> DeviceResult<()>;
}
