//! Simulation observer trait for progress reporting and snapshot output.

use lc_agent::AgentSet;
use lc_core::SimConfig;
use lc_lanemap::Lanemap;

use crate::RunSummary;

/// Error type returned by [`SimObserver::on_checkpoint`].
pub type ObserverError = Box<dyn std::error::Error + Send + Sync>;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: checkpoint counter
///
/// ```rust,ignore
/// struct Counter(usize);
///
/// impl SimObserver for Counter {
///     fn on_checkpoint(&mut self, _: f64, _: u64, _: &AgentSet, _: &Lanemap, _: f64)
///         -> Result<(), ObserverError>
///     {
///         self.0 += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called once after the device is initialised, before the first step.
    fn on_run_start(&mut self, _config: &SimConfig, _agents: &AgentSet) {}

    /// Called at every checkpoint with freshly retrieved host copies.
    ///
    /// `time` is the simulated time after `step` steps.  Returning an error
    /// aborts the run.
    fn on_checkpoint(
        &mut self,
        _time:       f64,
        _step:       u64,
        _agents:     &AgentSet,
        _lanemap:    &Lanemap,
        _delta_time: f64,
    ) -> Result<(), ObserverError> {
        Ok(())
    }

    /// Called once after the device has been released.
    fn on_run_end(&mut self, _summary: &RunSummary) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
