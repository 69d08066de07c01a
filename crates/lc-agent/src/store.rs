//! The origin/destination population.
//!
//! `AgentSet` is the host-side copy of every agent.  It is uploaded to the
//! device once and then refreshed in place by device retrieval at each
//! checkpoint.  Agent identity is the explicit [`Agent::id`] field; storage
//! order only fixes the order in which queries and snapshot rows are issued.

use lc_core::{AgentId, VertexId};

use crate::{Agent, DEFAULT_ROUTE_CAPACITY};

/// Host-side population of agents.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AgentSet {
    pub agents:     Vec<Agent>,
    route_capacity: usize,
}

impl AgentSet {
    #[inline]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Capacity of every agent's route buffer.
    #[inline]
    pub fn route_capacity(&self) -> usize {
        self.route_capacity
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Agent> {
        self.agents.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Agent> {
        self.agents.iter_mut()
    }

    pub fn as_slice(&self) -> &[Agent] {
        &self.agents
    }

    pub fn as_mut_slice(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    /// Origins in storage order.
    pub fn sources(&self) -> Vec<VertexId> {
        self.agents.iter().map(|a| a.origin).collect()
    }

    /// Destinations in storage order.
    pub fn targets(&self) -> Vec<VertexId> {
        self.agents.iter().map(|a| a.destination).collect()
    }

    /// Linear lookup by identity (storage order is not assumed).
    pub fn find(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }
}

/// Fluent builder for [`AgentSet`].
///
/// Ids are handed out sequentially in the order trips are added.
///
/// ```
/// use lc_agent::AgentSetBuilder;
/// use lc_core::{AgentId, VertexId};
///
/// let mut b = AgentSetBuilder::new(100);
/// let a = b.add_trip(VertexId(0), VertexId(3), 0);
/// let set = b.build();
/// assert_eq!(a, AgentId(0));
/// assert_eq!(set.len(), 1);
/// assert_eq!(set.route_capacity(), 100);
/// ```
pub struct AgentSetBuilder {
    route_capacity: usize,
    agents:         Vec<Agent>,
}

impl AgentSetBuilder {
    pub fn new(route_capacity: usize) -> Self {
        Self { route_capacity, agents: Vec::new() }
    }

    /// Reserve room for `count` trips.
    pub fn with_expected(mut self, count: usize) -> Self {
        self.agents.reserve(count);
        self
    }

    /// Add one trip and return the new agent's id.
    pub fn add_trip(&mut self, origin: VertexId, destination: VertexId, agent_type: u8) -> AgentId {
        let id = AgentId(self.agents.len() as u32);
        self.agents.push(Agent::new(id, origin, destination, agent_type, self.route_capacity));
        id
    }

    pub fn build(self) -> AgentSet {
        AgentSet { agents: self.agents, route_capacity: self.route_capacity }
    }
}

impl Default for AgentSetBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_ROUTE_CAPACITY)
    }
}
