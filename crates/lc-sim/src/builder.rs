//! Fluent builder for constructing a [`Sim`].

use lc_agent::AgentSet;
use lc_core::SimConfig;
use lc_lanemap::Lanemap;
use lc_network::{DijkstraIndex, Network, RoutingIndex};
use lc_routing::{AssignmentReport, LONG_ROUTE_EDGES, RouteAssigner};

use crate::{Sim, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`]: time window, save interval, step length, block size
/// - [`Network`]: routing graph, borrowed for route assignment only
/// - [`AgentSet`]: the OD population; routes are written into it
/// - [`Lanemap`]: merged-edge mapping plus the device arrays
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default                                  |
/// |--------------------------|------------------------------------------|
/// | `.routing_index(idx)`    | `DijkstraIndex::build(network)`          |
/// | `.long_route_edges(n)`   | [`LONG_ROUTE_EDGES`] (100)               |
/// | `.first_init(b)`         | `true` (edge period counters zeroed)     |
pub struct SimBuilder<'a> {
    config:           SimConfig,
    network:          &'a Network,
    agents:           AgentSet,
    lanemap:          Lanemap,
    index:            Option<&'a dyn RoutingIndex>,
    long_route_edges: usize,
    first_init:       bool,
}

impl<'a> SimBuilder<'a> {
    pub fn new(config: SimConfig, network: &'a Network, agents: AgentSet, lanemap: Lanemap) -> Self {
        Self {
            config,
            network,
            agents,
            lanemap,
            index:            None,
            long_route_edges: LONG_ROUTE_EDGES,
            first_init:       true,
        }
    }

    /// Use a prebuilt routing index instead of building a [`DijkstraIndex`].
    pub fn routing_index(mut self, index: &'a dyn RoutingIndex) -> Self {
        self.index = Some(index);
        self
    }

    /// Edge count above which a route is logged as suspiciously long.
    pub fn long_route_edges(mut self, edges: usize) -> Self {
        self.long_route_edges = edges;
        self
    }

    /// Whether the device should treat the upload as a fresh start and zero
    /// per-period edge counters.
    pub fn first_init(mut self, first_init: bool) -> Self {
        self.first_init = first_init;
        self
    }

    /// Validate the configuration, assign routes, and return a ready-to-run
    /// [`Sim`] together with the assignment report.
    pub fn build(self) -> SimResult<(Sim, AssignmentReport)> {
        self.config.validate()?;

        let mut agents = self.agents;
        let assigner = RouteAssigner::new(self.network, self.lanemap.mapping())
            .long_route_edges(self.long_route_edges);
        let report = match self.index {
            Some(index) => assigner.assign(index, &mut agents)?,
            None => assigner.assign(&DijkstraIndex::build(self.network), &mut agents)?,
        };

        let sim = Sim {
            clock:      self.config.make_clock(),
            config:     self.config,
            agents,
            lanemap:    self.lanemap,
            first_init: self.first_init,
        };
        Ok((sim, report))
    }
}
