//! Simulation time model.
//!
//! # Design
//!
//! Simulated time is a floating-point number of seconds, but it is never
//! accumulated by repeated addition.  `SimClock` counts integer steps and
//! derives the time from them:
//!
//!   time = start_time + step * delta_time
//!
//! so a run of a million steps lands on exactly the same clock value as the
//! closed-form product, and checkpoint cadence is pure integer arithmetic on
//! the step counter.

use std::fmt;

use crate::{CoreError, CoreResult};

/// Tolerance used when turning ratios of seconds into whole step counts
/// (e.g. `0.3 / 0.1` is `2.9999999999999996` in binary floating point).
const STEP_EPSILON: f64 = 1e-9;

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Step counter plus the affine map from steps to simulated seconds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated time (seconds) at step 0.
    pub start_time: f64,
    /// Seconds advanced by one step.
    pub delta_time: f64,
    /// Steps taken so far.
    pub step: u64,
}

impl SimClock {
    pub fn new(start_time: f64, delta_time: f64) -> Self {
        Self { start_time, delta_time, step: 0 }
    }

    /// Current simulated time in seconds.
    #[inline]
    pub fn time(&self) -> f64 {
        self.start_time + self.step as f64 * self.delta_time
    }

    /// Advance the clock by exactly one step.
    #[inline]
    pub fn advance(&mut self) {
        self.step += 1;
    }

    /// Simulated seconds elapsed since step 0.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.step as f64 * self.delta_time
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.time().max(0.0);
        let hours = (t / 3_600.0).floor() as u64;
        let minutes = ((t % 3_600.0) / 60.0).floor() as u64;
        let seconds = t % 60.0;
        write!(f, "step {} ({:02}:{:02}:{:04.1})", self.step, hours, minutes, seconds)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Run configuration consumed by the simulation driver.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// `SimBuilder`.  Call [`validate`](Self::validate) before allocating any
/// device resources.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Simulated time (seconds) at which the run starts.
    pub start_time: f64,

    /// The loop runs while simulated time is strictly below this value.
    pub end_time: f64,

    /// Seconds of simulated time between checkpoints.
    pub save_interval: f64,

    /// Seconds advanced per step.
    pub delta_time: f64,

    /// Agents per parallel work block.
    pub block_size: u32,

    /// Master seed for per-agent RNGs.
    pub seed: u64,

    /// Worker thread count for the host device.  `None` uses all logical cores.
    pub num_threads: Option<usize>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start_time:    0.0,
            end_time:      3_600.0,
            save_interval: 600.0,
            delta_time:    0.5,
            block_size:    384,
            seed:          42,
            num_threads:   None,
        }
    }
}

impl SimConfig {
    /// Steps between checkpoints: `floor(save_interval / delta_time)`.
    ///
    /// Returns `0` for non-finite or sub-step intervals; [`validate`](Self::validate)
    /// rejects that case.
    pub fn checkpoint_interval_steps(&self) -> u64 {
        let ratio = self.save_interval / self.delta_time;
        if !ratio.is_finite() || ratio < 0.0 {
            return 0;
        }
        (ratio + STEP_EPSILON).floor() as u64
    }

    /// Number of parallel work blocks needed for `agent_count` agents.
    #[inline]
    pub fn grid_size(&self, agent_count: usize) -> u32 {
        agent_count.div_ceil(self.block_size.max(1) as usize) as u32
    }

    /// Number of loop iterations: the count of `k >= 0` with
    /// `start_time + k * delta_time < end_time`.
    pub fn total_steps(&self) -> u64 {
        if self.delta_time <= 0.0 || self.end_time <= self.start_time {
            return 0;
        }
        let clock = |k: u64| self.start_time + k as f64 * self.delta_time;
        let mut k = ((self.end_time - self.start_time) / self.delta_time).ceil() as u64;
        while clock(k) < self.end_time {
            k += 1;
        }
        while k > 0 && clock(k - 1) >= self.end_time {
            k -= 1;
        }
        k
    }

    /// Construct a `SimClock` positioned at `start_time`.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start_time, self.delta_time)
    }

    /// Reject configurations that cannot drive a run.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.delta_time.is_finite() && self.delta_time > 0.0) {
            return Err(CoreError::Config(format!(
                "delta_time must be a positive number of seconds, got {}",
                self.delta_time
            )));
        }
        if !(self.start_time.is_finite() && self.end_time.is_finite()) {
            return Err(CoreError::Config("start_time and end_time must be finite".into()));
        }
        if self.end_time < self.start_time {
            return Err(CoreError::Config(format!(
                "end_time {} is before start_time {}",
                self.end_time, self.start_time
            )));
        }
        if self.block_size == 0 {
            return Err(CoreError::Config("block_size must be at least 1".into()));
        }
        if self.checkpoint_interval_steps() == 0 {
            return Err(CoreError::Config(format!(
                "save_interval {} is shorter than one step of {} s",
                self.save_interval, self.delta_time
            )));
        }
        Ok(())
    }
}
