//! The `Sim` struct and its step loop.

use tracing::{debug, info};

use lc_agent::AgentSet;
use lc_core::{SimClock, SimConfig};
use lc_device::{DeviceSession, DeviceSurface};
use lc_lanemap::Lanemap;

use crate::{SimError, SimObserver, SimResult};

/// What a completed [`Sim::run`] did.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    /// Device steps executed by this run.
    pub steps:       u64,
    /// Checkpoints delivered to the observer.
    pub checkpoints: u64,
    /// Simulated time when the loop stopped.
    pub end_time:    f64,
}

/// The simulation driver.
///
/// Holds the host copies of the population and the lane map.  Between
/// `init` and `finish` the device owns the authoritative state; the host
/// copies are only refreshed at checkpoints.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Validated configuration.
    pub config: SimConfig,

    /// Step counter and time mapping.
    pub clock: SimClock,

    /// Population with assigned routes.  Refreshed at each checkpoint.
    pub agents: AgentSet,

    /// Id mapping plus edge / lane / intersection arrays.  Edge aggregates
    /// and intersections are refreshed at each checkpoint.
    pub lanemap: Lanemap,

    pub(crate) first_init: bool,
}

impl Sim {
    // ── Public API ────────────────────────────────────────────────────────

    /// Upload state to `device`, step from `config.start_time` until
    /// `config.end_time`, and release the device.
    ///
    /// Every call starts a fresh clock; a repeated run uploads the host copies
    /// as they were left by the previous run's last checkpoint.
    ///
    /// Any device or observer failure aborts the run; the device is still
    /// finalised before the error is returned.
    pub fn run<D, O>(&mut self, device: &mut D, observer: &mut O) -> SimResult<RunSummary>
    where
        D: DeviceSurface + ?Sized,
        O: SimObserver + ?Sized,
    {
        self.config.validate()?;
        self.clock = self.config.make_clock();

        let agent_count        = self.agents.len();
        let intersection_count = self.lanemap.intersections().len();
        let grid_size          = self.config.grid_size(agent_count);
        let block_size         = self.config.block_size;
        let delta_time         = self.config.delta_time;
        let interval           = self.config.checkpoint_interval_steps();

        info!(
            agents = agent_count,
            merged_edges = self.lanemap.edge_aggregates().len(),
            lane_cells = self.lanemap.lane_cells().len(),
            intersections = intersection_count,
            grid_size,
            block_size,
            "uploading simulation state"
        );

        let mut session = DeviceSession::acquire(
            device,
            self.first_init,
            self.agents.as_slice(),
            self.lanemap.edge_aggregates(),
            self.lanemap.lane_cells(),
            self.lanemap.intersections(),
        )
        .map_err(|source| SimError::DeviceInit { source })?;

        observer.on_run_start(&self.config, &self.agents);
        info!(
            start = self.clock.time(),
            end = self.config.end_time,
            delta_time,
            checkpoint_every = interval,
            "simulation loop started"
        );

        let mut checkpoints = 0;
        while self.clock.time() < self.config.end_time {
            let time = self.clock.time();
            session
                .step(time, agent_count, intersection_count, delta_time, grid_size, block_size)
                .map_err(|source| SimError::DeviceStep { time, step: self.clock.step, source })?;
            self.clock.advance();

            if self.clock.step % interval == 0 {
                self.checkpoint(&session, observer)?;
                checkpoints += 1;
            }
        }

        session.release().map_err(|source| SimError::DeviceFinish { source })?;

        let summary = RunSummary {
            steps:    self.clock.step,
            checkpoints,
            end_time: self.clock.time(),
        };
        info!(steps = summary.steps, checkpoints, end_time = summary.end_time, "simulation loop finished");
        observer.on_run_end(&summary);
        Ok(summary)
    }

    // ── Checkpointing ─────────────────────────────────────────────────────

    fn checkpoint<D, O>(&mut self, session: &DeviceSession<'_, D>, observer: &mut O) -> SimResult<()>
    where
        D: DeviceSurface + ?Sized,
        O: SimObserver + ?Sized,
    {
        let time = self.clock.time();
        let step = self.clock.step;

        let (edges, intersections) = self.lanemap.device_arrays_mut();
        session
            .retrieve(self.agents.as_mut_slice(), edges, intersections)
            .map_err(|source| SimError::DeviceRetrieve { time, step, source })?;
        debug!(time, step, "retrieved device state");

        observer
            .on_checkpoint(time, step, &self.agents, &self.lanemap, self.config.delta_time)
            .map_err(|source| SimError::Observer { time, source })?;
        info!("checkpoint at {}", self.clock);
        Ok(())
    }
}
