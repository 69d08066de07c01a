//! Random numbers for stochastic step kernels.
//!
//! The host device keeps one [`AgentRng`] per agent, created at upload time
//! from the run seed and the agent's id. A kernel only ever sees the stream
//! of the agent it is stepping, so the draws an agent makes do not depend on
//! how agents are split into work blocks or which thread runs a block.

use rand::rngs::SmallRng;
use rand::distributions::uniform::{SampleRange, SampleUniform};
use rand::{Rng, SeedableRng};

use crate::AgentId;

/// Odd 64-bit multiplier (⌊2⁶⁴/φ⌋) that scatters consecutive agent ids
/// across the seed space.
const ID_SCATTER: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seed of `agent`'s stream in a run seeded with `run_seed`.
#[inline]
pub fn agent_seed(run_seed: u64, agent: AgentId) -> u64 {
    run_seed ^ u64::from(agent.0).wrapping_mul(ID_SCATTER)
}

/// One agent's random stream.
pub struct AgentRng(SmallRng);

impl AgentRng {
    pub fn new(run_seed: u64, agent: AgentId) -> Self {
        Self(SmallRng::seed_from_u64(agent_seed(run_seed, agent)))
    }

    /// Uniform draw from `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p`. Values outside `[0, 1]` saturate; NaN
    /// is never `true`.
    #[inline]
    pub fn chance(&mut self, p: f64) -> bool {
        if p.is_nan() || p <= 0.0 {
            return false;
        }
        p >= 1.0 || self.0.gen_bool(p)
    }
}
