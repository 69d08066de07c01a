//! The route assigner.

use tracing::{info, warn};

use lc_agent::{Agent, AgentSet, AgentStatus};
use lc_core::{AgentId, MergedEdgeId, VertexId};
use lc_lanemap::IdMapping;
use lc_network::{Network, RoutingIndex};

use crate::{AssignError, AssignResult};

/// Routes longer than this many edges are written in full but reported.
pub const LONG_ROUTE_EDGES: usize = 100;

/// Non-fatal per-agent diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteWarning {
    /// The index found no path; the agent keeps an empty route.
    NoRoute { agent: AgentId },
    /// The route has more edges than the soft threshold.
    LongRoute { agent: AgentId, edges: usize },
}

/// How one agent's path was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOutcome {
    /// Route buffer holds `edges` merged edges.
    Routed { edges: usize },
    /// Single-vertex path (origin == destination); nothing to drive.
    Trivial,
    /// Empty path from the index.
    NoRoute,
}

/// Summary of one assignment pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentReport {
    pub routed:   usize,
    pub trivial:  usize,
    pub unrouted: usize,
    /// In agent storage order, at most one `NoRoute` per agent.
    pub warnings: Vec<RouteWarning>,
}

impl AssignmentReport {
    /// Agents whose index result was empty.
    pub fn unrouted_agents(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.warnings.iter().filter_map(|w| match w {
            RouteWarning::NoRoute { agent } => Some(*agent),
            RouteWarning::LongRoute { .. } => None,
        })
    }
}

/// Writes shortest-path routes into agents' route buffers.
///
/// Borrowing only the network and the id mapping keeps the assigner cheap to
/// build; the routing index is passed per call so the caller controls its
/// lifetime (it is used exactly once and can be dropped afterwards).
pub struct RouteAssigner<'a> {
    network:          &'a Network,
    mapping:          &'a IdMapping,
    long_route_edges: usize,
}

impl<'a> RouteAssigner<'a> {
    pub fn new(network: &'a Network, mapping: &'a IdMapping) -> Self {
        Self { network, mapping, long_route_edges: LONG_ROUTE_EDGES }
    }

    /// Override the soft long-route threshold.
    pub fn long_route_edges(mut self, edges: usize) -> Self {
        self.long_route_edges = edges;
        self
    }

    /// Issue one batch query for the whole population and write every route.
    ///
    /// Each agent's buffer is cleared first, so re-running on unchanged
    /// inputs reproduces identical buffers.
    ///
    /// # Errors
    ///
    /// Any [`AssignError`] aborts the pass.  Agents processed before the
    /// failing one keep their new routes; the failing agent's buffer is left
    /// empty.
    pub fn assign<I>(&self, index: &I, agents: &mut AgentSet) -> AssignResult<AssignmentReport>
    where
        I: RoutingIndex + ?Sized,
    {
        let paths = index.batch_routes(&agents.sources(), &agents.targets())?;
        if paths.len() != agents.len() {
            return Err(AssignError::ResultCountMismatch { expected: agents.len(), got: paths.len() });
        }

        let mut report = AssignmentReport::default();
        for (agent, path) in agents.iter_mut().zip(&paths) {
            let edges = path.len().saturating_sub(1);
            if edges > self.long_route_edges {
                warn!(agent = agent.id.0, edges, "agent needs to go through {edges} edges");
                report.warnings.push(RouteWarning::LongRoute { agent: agent.id, edges });
            }

            match self.write_route(agent, path)? {
                PathOutcome::Routed { .. } => report.routed += 1,
                PathOutcome::Trivial => report.trivial += 1,
                PathOutcome::NoRoute => {
                    warn!(agent = agent.id.0, "agent has no route");
                    report.warnings.push(RouteWarning::NoRoute { agent: agent.id });
                    report.unrouted += 1;
                }
            }
        }

        info!(
            agents = agents.len(),
            routed = report.routed,
            trivial = report.trivial,
            unrouted = report.unrouted,
            "route assignment complete"
        );
        Ok(report)
    }

    /// Translate one vertex path into `agent`'s route buffer.
    ///
    /// Every merged edge is resolved before anything is written, so a
    /// failing path never leaves a partial route behind.
    pub fn write_route(&self, agent: &mut Agent, path: &[VertexId]) -> AssignResult<PathOutcome> {
        agent.route.clear();
        agent.route_index = 0;

        match path.len() {
            0 => {
                agent.status = AgentStatus::Pending;
                return Ok(PathOutcome::NoRoute);
            }
            1 => {
                agent.status = AgentStatus::Finished;
                return Ok(PathOutcome::Trivial);
            }
            _ => {}
        }

        let edges = path.len() - 1;
        if edges > agent.route.capacity() {
            return Err(AssignError::RouteCapacityExceeded {
                agent:    agent.id,
                edges,
                capacity: agent.route.capacity(),
            });
        }

        let mids = path
            .windows(2)
            .map(|pair| self.resolve(agent.id, pair[0], pair[1]))
            .collect::<AssignResult<Vec<MergedEdgeId>>>()?;

        for mid in mids {
            agent.route.push(mid)?;
        }
        agent.status = AgentStatus::Pending;
        Ok(PathOutcome::Routed { edges })
    }

    fn resolve(&self, agent: AgentId, from: VertexId, to: VertexId) -> AssignResult<MergedEdgeId> {
        let eid = self
            .network
            .edge_id(from, to)
            .ok_or(AssignError::MissingEdge { agent, from, to })?;
        self.mapping
            .mid(eid)
            .ok_or(AssignError::UnmappedEdge { agent, eid })
    }
}
