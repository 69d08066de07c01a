//! `HostDevice` — an in-process device that emulates the parallel grid.
//!
//! # Step phases
//!
//! ```text
//! ① Intersections  : kernel.step_intersection for every intersection,
//!                    reading the previous step's intersection array.
//! ② Agents         : kernel.step_agent for every agent, reading step-t
//!                    edges / lane cells and collecting Transitions.
//!                    (parallel with the `parallel` feature, chunks of
//!                    block_size agents per work unit)
//! ── barrier ──
//! ③ Apply          : Transitions applied in ascending AgentId order.
//! ```

use lc_agent::Agent;
use lc_core::{AgentId, AgentRng};
use lc_lanemap::{EdgeAggregate, Intersection};

use crate::{DeviceError, DeviceResult, DeviceSurface, StepContext, StepKernel, Transition};

/// Device-resident copies of the simulation arrays.
struct DeviceState {
    agents:        Vec<Agent>,
    rngs:          Vec<AgentRng>,
    edges:         Vec<EdgeAggregate>,
    lane_cells:    Vec<u8>,
    intersections: Vec<Intersection>,
    step:          u64,
}

/// A [`DeviceSurface`] that runs a [`StepKernel`] on the host.
///
/// Holds no state until `init` and drops everything at `finish`.
pub struct HostDevice<K: StepKernel> {
    kernel: K,
    seed:   u64,
    state:  Option<DeviceState>,
}

impl<K: StepKernel> HostDevice<K> {
    /// `seed` seeds the per-agent RNGs created at `init`.
    pub fn new(kernel: K, seed: u64) -> Self {
        Self { kernel, seed, state: None }
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Steps executed since `init`, or `None` when uninitialised.
    pub fn steps_taken(&self) -> Option<u64> {
        self.state.as_ref().map(|s| s.step)
    }
}

impl<K: StepKernel> DeviceSurface for HostDevice<K> {
    fn init(
        &mut self,
        first_init:    bool,
        agents:        &[Agent],
        edges:         &[EdgeAggregate],
        lane_cells:    &[u8],
        intersections: &[Intersection],
    ) -> DeviceResult<()> {
        if self.state.is_some() {
            return Err(DeviceError::AlreadyInitialized);
        }

        let mut edges = edges.to_vec();
        if first_init {
            edges.iter_mut().for_each(EdgeAggregate::reset_period);
        }

        self.state = Some(DeviceState {
            agents: agents.to_vec(),
            rngs: agents.iter().map(|a| AgentRng::new(self.seed, a.id)).collect(),
            edges,
            lane_cells: lane_cells.to_vec(),
            intersections: intersections.to_vec(),
            step: 0,
        });
        Ok(())
    }

    fn step(
        &mut self,
        current_time:       f64,
        agent_count:        usize,
        intersection_count: usize,
        delta_time:         f64,
        grid_size:          u32,
        block_size:         u32,
    ) -> DeviceResult<()> {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let kernel = &self.kernel;
        let state = self.state.as_mut().ok_or(DeviceError::NotInitialized)?;

        check_len("agents", state.agents.len(), agent_count)?;
        check_len("intersections", state.intersections.len(), intersection_count)?;
        if (grid_size as usize) * (block_size as usize) < agent_count {
            return Err(DeviceError::LaunchConfig { grid_size, block_size, agent_count });
        }

        // ── Phase 1: intersections ────────────────────────────────────────
        let previous = state.intersections.clone();
        {
            let ctx = StepContext {
                time:          current_time,
                delta_time,
                step:          state.step,
                edges:         &state.edges,
                lane_cells:    &state.lane_cells,
                intersections: &previous,
            };

            #[cfg(not(feature = "parallel"))]
            state
                .intersections
                .iter_mut()
                .for_each(|i| kernel.step_intersection(&ctx, i));

            #[cfg(feature = "parallel")]
            {
                use rayon::prelude::*;
                state
                    .intersections
                    .par_iter_mut()
                    .for_each(|i| kernel.step_intersection(&ctx, i));
            }
        }

        // ── Phase 2: agents (produce transitions) ─────────────────────────
        let mut emitted: Vec<(AgentId, Vec<Transition>)> = {
            let ctx = StepContext {
                time:          current_time,
                delta_time,
                step:          state.step,
                edges:         &state.edges,
                lane_cells:    &state.lane_cells,
                intersections: &state.intersections,
            };

            #[cfg(not(feature = "parallel"))]
            {
                let _ = block_size;
                state
                    .agents
                    .iter_mut()
                    .zip(state.rngs.iter_mut())
                    .map(|(agent, rng)| (agent.id, kernel.step_agent(&ctx, agent, rng)))
                    .filter(|(_, t)| !t.is_empty())
                    .collect()
            }

            #[cfg(feature = "parallel")]
            {
                use rayon::prelude::*;
                state
                    .agents
                    .par_iter_mut()
                    .zip(state.rngs.par_iter_mut())
                    .with_min_len(block_size.max(1) as usize)
                    .map(|(agent, rng)| (agent.id, kernel.step_agent(&ctx, agent, rng)))
                    .filter(|(_, t)| !t.is_empty())
                    .collect()
            }
        };

        // ── Phase 3: apply (consume) ──────────────────────────────────────
        //
        // Stable sort by identity, not storage position.
        emitted.sort_by_key(|(agent, _)| *agent);
        for (agent, transitions) in emitted {
            for transition in transitions {
                apply(&mut state.edges, &mut state.lane_cells, agent, transition)?;
            }
        }

        state.step += 1;
        Ok(())
    }

    fn retrieve(
        &self,
        agents:        &mut [Agent],
        edges:         &mut [EdgeAggregate],
        intersections: &mut [Intersection],
    ) -> DeviceResult<()> {
        let state = self.state.as_ref().ok_or(DeviceError::NotInitialized)?;
        check_len("agents", state.agents.len(), agents.len())?;
        check_len("edge aggregates", state.edges.len(), edges.len())?;
        check_len("intersections", state.intersections.len(), intersections.len())?;

        agents.clone_from_slice(&state.agents);
        edges.copy_from_slice(&state.edges);
        intersections.copy_from_slice(&state.intersections);
        Ok(())
    }

    fn finish(&mut self) -> DeviceResult<()> {
        self.state.take().map(drop).ok_or(DeviceError::NotInitialized)
    }
}

fn check_len(what: &'static str, expected: usize, got: usize) -> DeviceResult<()> {
    if expected != got {
        return Err(DeviceError::ShapeMismatch { what, expected, got });
    }
    Ok(())
}

fn apply(
    edges:      &mut [EdgeAggregate],
    lane_cells: &mut [u8],
    agent:      AgentId,
    transition: Transition,
) -> DeviceResult<()> {
    let invalid = || DeviceError::InvalidTransition { agent, transition };
    match transition {
        Transition::Enter { mid } => {
            let edge = edges.get_mut(mid.index()).ok_or_else(invalid)?;
            edge.upstream_count += 1;
        }
        Transition::Leave { mid, travel_steps } => {
            let edge = edges.get_mut(mid.index()).ok_or_else(invalid)?;
            edge.downstream_count += 1;
            edge.period_cum_travel_steps += travel_steps;
        }
        Transition::SetCell { index, value } => {
            let cell = lane_cells.get_mut(index as usize).ok_or_else(invalid)?;
            *cell = value;
        }
    }
    Ok(())
}
