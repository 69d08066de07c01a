//! Unit tests for lc-sim.

use std::sync::{Arc, Mutex};

use lc_agent::{Agent, AgentSet, AgentSetBuilder, AgentStatus};
use lc_core::{AgentRng, MergedEdgeId, SimConfig, VertexId};
use lc_device::{
    DeviceError, DeviceResult, DeviceSurface, HostDevice, NoopKernel, StepContext, StepKernel, Transition,
};
use lc_lanemap::{EdgeAggregate, Intersection, Lanemap};
use lc_network::{Network, NetworkBuilder};

use crate::{ObserverError, RunSummary, SimBuilder, SimError, SimObserver};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(end_time: f64, save_interval: f64, delta_time: f64) -> SimConfig {
    SimConfig {
        start_time: 0.0,
        end_time,
        save_interval,
        delta_time,
        block_size: 4,
        seed: 42,
        num_threads: Some(1),
    }
}

/// 0 → 1 → 2 → 3, unit weights, 10 m edges.
fn line_network() -> Network {
    let mut b = NetworkBuilder::new(4);
    b.add_edge(VertexId(0), VertexId(1), 1.0, 10.0);
    b.add_edge(VertexId(1), VertexId(2), 1.0, 10.0);
    b.add_edge(VertexId(2), VertexId(3), 1.0, 10.0);
    b.build().unwrap()
}

fn population(trips: &[(u32, u32)]) -> AgentSet {
    let mut b = AgentSetBuilder::new(8);
    for &(o, d) in trips {
        b.add_trip(VertexId(o), VertexId(d), 0);
    }
    b.build()
}

/// Device that records every call and can be told to fail.
#[derive(Clone, Default)]
struct ScriptedDevice {
    log:        Arc<Mutex<Vec<String>>>,
    fail_init:  bool,
    fail_step:  Option<u64>,
    steps:      u64,
    ready:      bool,
}

impl ScriptedDevice {
    fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

impl DeviceSurface for ScriptedDevice {
    fn init(&mut self, first_init: bool, agents: &[Agent], _: &[EdgeAggregate], _: &[u8], _: &[Intersection]) -> DeviceResult<()> {
        self.log.lock().unwrap().push(format!("init {first_init} {}", agents.len()));
        if self.fail_init {
            return Err(DeviceError::Backend("out of device memory".into()));
        }
        self.ready = true;
        Ok(())
    }

    fn step(&mut self, time: f64, agents: usize, _: usize, dt: f64, grid: u32, block: u32) -> DeviceResult<()> {
        self.log.lock().unwrap().push(format!("step {time} {agents} {dt} {grid}x{block}"));
        if self.fail_step == Some(self.steps) {
            return Err(DeviceError::Backend("kernel fault".into()));
        }
        self.steps += 1;
        Ok(())
    }

    fn retrieve(&self, _: &mut [Agent], _: &mut [EdgeAggregate], _: &mut [Intersection]) -> DeviceResult<()> {
        self.log.lock().unwrap().push("retrieve".into());
        Ok(())
    }

    fn finish(&mut self) -> DeviceResult<()> {
        self.log.lock().unwrap().push("finish".into());
        if !self.ready {
            return Err(DeviceError::NotInitialized);
        }
        self.ready = false;
        Ok(())
    }
}

/// Records every checkpoint it is shown.
#[derive(Default)]
struct Recorder {
    started:     bool,
    checkpoints: Vec<(f64, u64)>,
    summary:     Option<RunSummary>,
    fail_at:     Option<usize>,
    agent_steps: Vec<u32>,
    upstream:    Vec<u32>,
}

impl SimObserver for Recorder {
    fn on_run_start(&mut self, _config: &SimConfig, _agents: &AgentSet) {
        self.started = true;
    }

    fn on_checkpoint(
        &mut self,
        time:        f64,
        step:        u64,
        agents:      &AgentSet,
        lanemap:     &Lanemap,
        _delta_time: f64,
    ) -> Result<(), ObserverError> {
        if self.fail_at == Some(self.checkpoints.len()) {
            return Err("disk full".into());
        }
        self.checkpoints.push((time, step));
        self.agent_steps = agents.iter().map(|a| a.stats.num_steps).collect();
        self.upstream = lanemap.edge_aggregates().iter().map(|e| e.upstream_count).collect();
        Ok(())
    }

    fn on_run_end(&mut self, summary: &RunSummary) {
        self.summary = Some(summary.clone());
    }
}

/// Counts steps and enters the first route edge on step 0.
struct EnterFirstEdge;

impl StepKernel for EnterFirstEdge {
    fn step_agent(&self, ctx: &StepContext<'_>, agent: &mut Agent, _rng: &mut AgentRng) -> Vec<Transition> {
        agent.stats.num_steps += 1;
        match (ctx.step, agent.route.get(0)) {
            (0, Some(mid)) => {
                agent.status = AgentStatus::Active;
                vec![Transition::Enter { mid }]
            }
            _ => vec![],
        }
    }
}

// ── SimBuilder ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn build_assigns_routes() {
        let net = line_network();
        let lanemap = Lanemap::from_network(&net, 1).unwrap();
        let (sim, report) = SimBuilder::new(test_config(10.0, 5.0, 1.0), &net, population(&[(0, 3), (3, 0)]), lanemap)
            .build()
            .unwrap();

        assert_eq!(sim.agents.agents[0].route.as_slice(), &[MergedEdgeId(0), MergedEdgeId(1), MergedEdgeId(2)]);
        assert_eq!(sim.agents.agents[1].route_size(), 0);
        assert_eq!(report.routed, 1);
        assert_eq!(report.unrouted, 1);
    }

    #[test]
    fn explicit_routing_index_is_used() {
        use lc_network::{NetworkResult, RoutingIndex};

        struct Nowhere;
        impl RoutingIndex for Nowhere {
            fn batch_routes(&self, sources: &[VertexId], _: &[VertexId]) -> NetworkResult<Vec<Vec<VertexId>>> {
                Ok(vec![vec![]; sources.len()])
            }
        }

        let net = line_network();
        let lanemap = Lanemap::from_network(&net, 1).unwrap();
        let (sim, report) = SimBuilder::new(test_config(10.0, 5.0, 1.0), &net, population(&[(0, 3)]), lanemap)
            .routing_index(&Nowhere)
            .build()
            .unwrap();
        assert_eq!(report.unrouted, 1);
        assert_eq!(sim.agents.agents[0].route_size(), 0);
    }

    #[test]
    fn invalid_config_rejected_before_routing() {
        let net = line_network();
        let lanemap = Lanemap::from_network(&net, 1).unwrap();
        // Save interval shorter than one step.
        let result = SimBuilder::new(test_config(10.0, 0.2, 0.5), &net, population(&[(0, 3)]), lanemap).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn end_before_start_rejected() {
        let net = line_network();
        let lanemap = Lanemap::from_network(&net, 1).unwrap();
        let mut config = test_config(10.0, 5.0, 1.0);
        config.start_time = 20.0;
        let result = SimBuilder::new(config, &net, population(&[]), lanemap).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn capacity_overflow_is_an_assignment_error() {
        let net = line_network();
        let lanemap = Lanemap::from_network(&net, 1).unwrap();
        let mut b = AgentSetBuilder::new(2);
        b.add_trip(VertexId(0), VertexId(3), 0);
        let result = SimBuilder::new(test_config(10.0, 5.0, 1.0), &net, b.build(), lanemap).build();
        assert!(matches!(result, Err(SimError::Assign(_))));
    }
}

// ── Checkpoint cadence ────────────────────────────────────────────────────────

#[cfg(test)]
mod cadence_tests {
    use super::*;

    fn run_cadence(config: SimConfig) -> (Recorder, RunSummary) {
        let net = line_network();
        let lanemap = Lanemap::from_network(&net, 1).unwrap();
        let (mut sim, _) = SimBuilder::new(config, &net, population(&[(0, 3)]), lanemap).build().unwrap();
        let mut device = HostDevice::new(NoopKernel, 1);
        let mut rec = Recorder::default();
        let summary = sim.run(&mut device, &mut rec).unwrap();
        (rec, summary)
    }

    #[test]
    fn divisible_duration_checkpoints_at_end() {
        // T = 10, I = 2.5, dt = 0.5 → every 5 steps, 20 steps.
        let (rec, summary) = run_cadence(test_config(10.0, 2.5, 0.5));
        let steps: Vec<u64> = rec.checkpoints.iter().map(|c| c.1).collect();
        assert_eq!(steps, [5, 10, 15, 20]);
        let times: Vec<f64> = rec.checkpoints.iter().map(|c| c.0).collect();
        assert_eq!(times, [2.5, 5.0, 7.5, 10.0]);
        assert_eq!(summary.steps, 20);
        assert_eq!(summary.checkpoints, 4);
        assert_eq!(summary.end_time, 10.0);
    }

    #[test]
    fn non_divisible_duration_floors() {
        // T = 9, I = 2, dt = 0.5 → every 4 steps, 18 steps → floor(9 / 2) = 4.
        let (rec, summary) = run_cadence(test_config(9.0, 2.0, 0.5));
        assert_eq!(rec.checkpoints.len(), 4);
        assert!(rec.checkpoints.iter().all(|&(_, step)| step % 4 == 0));
        assert_eq!(summary.steps, 18);
    }

    #[test]
    fn interval_floors_partial_steps() {
        // 1.7 / 0.5 → every 3 steps; 12 steps → 4 checkpoints.
        let (rec, _) = run_cadence(test_config(6.0, 1.7, 0.5));
        let steps: Vec<u64> = rec.checkpoints.iter().map(|c| c.1).collect();
        assert_eq!(steps, [3, 6, 9, 12]);
    }

    #[test]
    fn fractional_delta_does_not_drift() {
        // 0.1 s steps over 30 s: exactly 300 steps, 30 checkpoints.
        let (rec, summary) = run_cadence(test_config(30.0, 1.0, 0.1));
        assert_eq!(summary.steps, 300);
        assert_eq!(rec.checkpoints.len(), 30);
    }

    #[test]
    fn offset_start_time() {
        let mut config = test_config(110.0, 5.0, 1.0);
        config.start_time = 100.0;
        let (rec, _) = run_cadence(config);
        let times: Vec<f64> = rec.checkpoints.iter().map(|c| c.0).collect();
        assert_eq!(times, [105.0, 110.0]);
    }

    #[test]
    fn repeated_run_restarts_the_clock() {
        let net = line_network();
        let lanemap = Lanemap::from_network(&net, 1).unwrap();
        let config = test_config(5.0, 1.0, 0.5);
        let (mut sim, _) = SimBuilder::new(config, &net, population(&[(0, 3)]), lanemap).build().unwrap();
        let mut device = HostDevice::new(NoopKernel, 1);

        let mut first = Recorder::default();
        let first_summary = sim.run(&mut device, &mut first).unwrap();
        let mut second = Recorder::default();
        let second_summary = sim.run(&mut device, &mut second).unwrap();

        assert_eq!(second_summary, first_summary);
        assert_eq!(second_summary.steps, 10);
        assert_eq!(second.checkpoints, first.checkpoints);
        assert_eq!(sim.clock.step, 10);
    }

    #[test]
    fn empty_window_runs_no_steps() {
        let (rec, summary) = run_cadence(test_config(0.0, 1.0, 0.5));
        assert!(rec.started);
        assert!(rec.checkpoints.is_empty());
        assert_eq!(summary.steps, 0);
        assert_eq!(rec.summary, Some(summary));
    }
}

// ── Device interaction ────────────────────────────────────────────────────────

#[cfg(test)]
mod device_tests {
    use super::*;

    fn sim_for(trips: &[(u32, u32)], config: SimConfig) -> crate::Sim {
        let net = line_network();
        let lanemap = Lanemap::from_network(&net, 1).unwrap();
        SimBuilder::new(config, &net, population(trips), lanemap).build().unwrap().0
    }

    #[test]
    fn call_sequence() {
        let mut sim = sim_for(&[(0, 3), (1, 3)], test_config(2.0, 1.0, 0.5));
        let mut device = ScriptedDevice::default();
        let log = device.clone();
        sim.run(&mut device, &mut crate::NoopObserver).unwrap();

        assert_eq!(
            log.calls(),
            [
                "init true 2",
                "step 0 2 0.5 1x4",
                "step 0.5 2 0.5 1x4",
                "retrieve",
                "step 1 2 0.5 1x4",
                "step 1.5 2 0.5 1x4",
                "retrieve",
                "finish",
            ]
        );
    }

    #[test]
    fn first_init_flag_is_forwarded() {
        let net = line_network();
        let lanemap = Lanemap::from_network(&net, 1).unwrap();
        let (mut sim, _) = SimBuilder::new(test_config(1.0, 1.0, 1.0), &net, population(&[(0, 1)]), lanemap)
            .first_init(false)
            .build()
            .unwrap();
        let mut device = ScriptedDevice::default();
        let log = device.clone();
        sim.run(&mut device, &mut crate::NoopObserver).unwrap();
        assert_eq!(log.calls()[0], "init false 1");
    }

    #[test]
    fn grid_covers_population() {
        let trips: Vec<(u32, u32)> = (0..9).map(|_| (0, 3)).collect();
        let mut sim = sim_for(&trips, test_config(1.0, 1.0, 1.0));
        let mut device = ScriptedDevice::default();
        let log = device.clone();
        sim.run(&mut device, &mut crate::NoopObserver).unwrap();
        // 9 agents, block 4 → 3 blocks.
        assert_eq!(log.calls()[1], "step 0 9 1 3x4");
    }

    #[test]
    fn init_failure_is_fatal() {
        let mut sim = sim_for(&[(0, 3)], test_config(2.0, 1.0, 0.5));
        let mut device = ScriptedDevice { fail_init: true, ..ScriptedDevice::default() };
        let log = device.clone();
        let mut rec = Recorder::default();
        let err = sim.run(&mut device, &mut rec).unwrap_err();

        assert!(matches!(err, SimError::DeviceInit { .. }));
        assert!(!rec.started);
        assert_eq!(log.calls(), ["init true 1"]);
    }

    #[test]
    fn step_failure_reports_time_and_step() {
        let mut sim = sim_for(&[(0, 3)], test_config(5.0, 1.0, 0.5));
        let mut device = ScriptedDevice { fail_step: Some(3), ..ScriptedDevice::default() };
        let log = device.clone();
        let err = sim.run(&mut device, &mut crate::NoopObserver).unwrap_err();

        match err {
            SimError::DeviceStep { time, step, .. } => {
                assert_eq!(step, 3);
                assert_eq!(time, 1.5);
            }
            other => panic!("unexpected error: {other}"),
        }
        // Session dropped on the error path still finalises the device.
        assert_eq!(log.calls().last().map(String::as_str), Some("finish"));
    }

    #[test]
    fn observer_failure_aborts_and_finishes() {
        let mut sim = sim_for(&[(0, 3)], test_config(5.0, 1.0, 0.5));
        let mut device = ScriptedDevice::default();
        let log = device.clone();
        let mut rec = Recorder { fail_at: Some(1), ..Recorder::default() };
        let err = sim.run(&mut device, &mut rec).unwrap_err();

        assert!(matches!(err, SimError::Observer { time, .. } if time == 2.0));
        assert_eq!(rec.checkpoints.len(), 1);
        assert!(rec.summary.is_none());
        assert_eq!(log.calls().last().map(String::as_str), Some("finish"));
    }

    #[test]
    fn checkpoints_see_device_state() {
        let mut sim = sim_for(&[(0, 3), (1, 3), (3, 0)], test_config(4.0, 2.0, 1.0));
        let mut device = HostDevice::new(EnterFirstEdge, 7);
        let mut rec = Recorder::default();
        sim.run(&mut device, &mut rec).unwrap();

        assert_eq!(rec.agent_steps, [4, 4, 4]);
        // Agent 0 entered mid 0, agent 1 entered mid 1, agent 2 has no route.
        assert_eq!(rec.upstream, [1, 1, 0]);
        // Host copies hold the last checkpoint.
        assert_eq!(sim.agents.agents[0].status, AgentStatus::Active);
        assert_eq!(sim.agents.agents[2].status, AgentStatus::Pending);
        assert!(!device.is_initialized());
    }
}
