//! A deliberately small traffic model for the demo.
//!
//! Agents accelerate toward a free-flow speed, occasionally slow down at
//! random, wait at red signals at the end of an edge, and move to the next
//! route edge when they pass the end of the current one.  Signals flip
//! every `SIGNAL_CYCLE_S` seconds.

use lc_agent::{Agent, AgentStatus};
use lc_core::AgentRng;
use lc_device::{StepContext, StepKernel, Transition};
use lc_lanemap::{EMPTY_CELL, Intersection};

const SIGNAL_CYCLE_S: f64 = 30.0;
const FREE_FLOW_MPS:  f32 = 12.0;
const ACCEL_MPS2:     f32 = 2.0;
const SLOWDOWN_P:     f64 = 0.05;

pub struct FreeFlowKernel;

impl FreeFlowKernel {
    /// Cell index occupied at `position_m` on the agent's current lane.
    fn cell(ctx: &StepContext<'_>, agent: &Agent, mid: usize, position_m: f32) -> Option<u32> {
        let edge = ctx.edges.get(mid)?;
        let per_lane = edge.cells_per_lane();
        let offset = (position_m.max(0.0) as u32).min(per_lane - 1);
        Some(edge.lane_offset + agent.lane as u32 * per_lane + offset)
    }
}

impl StepKernel for FreeFlowKernel {
    fn step_intersection(&self, ctx: &StepContext<'_>, intersection: &mut Intersection) {
        let held = (ctx.step - intersection.last_change_step) as f64 * ctx.delta_time;
        if held >= SIGNAL_CYCLE_S {
            intersection.state ^= 1;
            intersection.last_change_step = ctx.step;
        }
    }

    fn step_agent(&self, ctx: &StepContext<'_>, agent: &mut Agent, rng: &mut AgentRng) -> Vec<Transition> {
        let mut out = Vec::new();
        let route_len = agent.route_size() as u32;

        match agent.status {
            AgentStatus::Finished => return out,
            AgentStatus::Pending if route_len == 0 => return out,
            AgentStatus::Pending => {
                let Some(first) = agent.route.get(0) else { return out };
                agent.status = AgentStatus::Active;
                agent.route_index = 0;
                agent.edge_position_m = 0.0;
                agent.edge_entry_step = ctx.step;
                out.push(Transition::Enter { mid: first });
            }
            AgentStatus::Active => {}
        }

        let Some(mid) = agent.route.get(agent.route_index as usize) else { return out };
        let Some(edge) = ctx.edges.get(mid.index()) else { return out };
        let old_cell = Self::cell(ctx, agent, mid.index(), agent.edge_position_m);

        // Speed update.
        let mut speed = (agent.speed_mps + ACCEL_MPS2 * ctx.delta_time as f32).min(FREE_FLOW_MPS);
        if rng.chance(SLOWDOWN_P) {
            speed *= 0.5;
            agent.stats.slow_down_steps += 1;
        }

        // Hold at a red signal at the downstream intersection.
        let red = ctx
            .intersections
            .get(edge.vertices[1].index())
            .is_some_and(|i| i.state == 1);
        let mut position = agent.edge_position_m + speed * ctx.delta_time as f32;
        if red && position >= edge.length_m {
            position = (edge.length_m - 0.5).max(agent.edge_position_m);
            speed = 0.0;
            agent.stats.num_steps_in_queue += 1;
        }

        agent.stats.num_steps += 1;
        agent.stats.cum_speed += speed as f64;
        agent.stats.cum_length_m += (position - agent.edge_position_m) as f64;
        agent.speed_mps = speed;

        if let Some(index) = old_cell {
            out.push(Transition::SetCell { index, value: EMPTY_CELL });
        }

        if position < edge.length_m {
            agent.edge_position_m = position;
            if let Some(index) = Self::cell(ctx, agent, mid.index(), position) {
                out.push(Transition::SetCell { index, value: speed as u8 });
            }
            return out;
        }

        // Crossed the end of the edge.
        out.push(Transition::Leave { mid, travel_steps: ctx.step + 1 - agent.edge_entry_step });
        agent.route_index += 1;
        agent.edge_position_m = position - edge.length_m;
        agent.edge_entry_step = ctx.step + 1;
        match agent.route.get(agent.route_index as usize) {
            Some(next) => out.push(Transition::Enter { mid: next }),
            None => {
                agent.status = AgentStatus::Finished;
                agent.speed_mps = 0.0;
            }
        }
        out
    }
}
