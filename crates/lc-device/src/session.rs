//! Scoped ownership of an initialised device.

use tracing::{debug, warn};

use lc_agent::Agent;
use lc_lanemap::{EdgeAggregate, Intersection};

use crate::{DeviceResult, DeviceSurface};

/// An initialised device, released exactly once.
///
/// `acquire` runs `init`; [`release`](Self::release) runs `finish` and
/// reports its result.  If the session is dropped without being released
/// (e.g. the run aborted on an error), `finish` still runs and any failure
/// is logged.
pub struct DeviceSession<'d, D: DeviceSurface + ?Sized> {
    device:   &'d mut D,
    released: bool,
}

impl<'d, D: DeviceSurface + ?Sized> DeviceSession<'d, D> {
    pub fn acquire(
        device:        &'d mut D,
        first_init:    bool,
        agents:        &[Agent],
        edges:         &[EdgeAggregate],
        lane_cells:    &[u8],
        intersections: &[Intersection],
    ) -> DeviceResult<Self> {
        device.init(first_init, agents, edges, lane_cells, intersections)?;
        debug!(
            agents = agents.len(),
            edges = edges.len(),
            lane_cells = lane_cells.len(),
            intersections = intersections.len(),
            "device session acquired"
        );
        Ok(Self { device, released: false })
    }

    pub fn step(
        &mut self,
        current_time:       f64,
        agent_count:        usize,
        intersection_count: usize,
        delta_time:         f64,
        grid_size:          u32,
        block_size:         u32,
    ) -> DeviceResult<()> {
        self.device.step(current_time, agent_count, intersection_count, delta_time, grid_size, block_size)
    }

    pub fn retrieve(
        &self,
        agents:        &mut [Agent],
        edges:         &mut [EdgeAggregate],
        intersections: &mut [Intersection],
    ) -> DeviceResult<()> {
        self.device.retrieve(agents, edges, intersections)
    }

    /// Free device state.
    pub fn release(mut self) -> DeviceResult<()> {
        self.released = true;
        self.device.finish()
    }
}

impl<D: DeviceSurface + ?Sized> Drop for DeviceSession<'_, D> {
    fn drop(&mut self) {
        if !self.released {
            if let Err(e) = self.device.finish() {
                warn!(error = %e, "device finish failed while dropping an unreleased session");
            }
        }
    }
}
