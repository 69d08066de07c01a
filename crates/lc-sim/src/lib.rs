//! `lc-sim` — the simulation driver.
//!
//! # Run sequence
//!
//! ```text
//! SimBuilder::build
//!   ① validate SimConfig            (before any device resource exists)
//!   ② RouteAssigner::assign          (once, synchronously)
//!
//! Sim::run
//!   ③ DeviceSession::acquire         → device.init(agents, edges, cells, intersections)
//!   ④ while clock.time() < end_time:
//!        device.step(time, …)
//!        clock.advance()
//!        if clock.step % checkpoint_interval == 0:
//!            device.retrieve → host copies
//!            observer.on_checkpoint(time, …)
//!   ⑤ DeviceSession::release         → device.finish()
//! ```
//!
//! Simulated time is derived from the step counter, so the checkpoint
//! cadence is exact: a run of duration `T` with save interval `I` produces
//! `floor(T / I)` checkpoints.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                       |
//! |------------|--------------------------------------------------------------|
//! | `parallel` | Rayon batch routing and parallel `HostDevice` step phases.   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use lc_device::{HostDevice, NoopKernel};
//! use lc_sim::{NoopObserver, SimBuilder};
//!
//! let (mut sim, report) = SimBuilder::new(config, &network, agents, lanemap).build()?;
//! let mut device = HostDevice::new(NoopKernel, sim.config.seed);
//! let summary = sim.run(&mut device, &mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, ObserverError, SimObserver};
pub use sim::{RunSummary, Sim};
