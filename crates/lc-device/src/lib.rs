//! `lc-device` — where simulation state lives while the clock runs.
//!
//! # Contract
//!
//! A device is driven strictly sequentially by the host:
//!
//! ```text
//! init ──▶ step ──▶ step ──▶ … (retrieve at checkpoints) … ──▶ finish
//! ```
//!
//! Between `init` and `finish` the device exclusively owns the agent,
//! edge-aggregate, lane-cell, and intersection arrays.  The host only ever
//! sees point-in-time copies produced by `retrieve`, which never mutates
//! device state.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`surface`]     | `DeviceSurface` trait: init / step / retrieve / finish     |
//! | [`session`]     | `DeviceSession`: scoped acquire/release of a device        |
//! | [`kernel`]      | `StepKernel` trait, `StepContext`, `NoopKernel`            |
//! | [`transition`]  | `Transition`: shared-state writes emitted by kernels       |
//! | [`host`]        | `HostDevice<K>`: data-parallel in-process device           |
//! | [`error`]       | `DeviceError`, `DeviceResult<T>`                           |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | `HostDevice` runs both step phases on Rayon.           |

pub mod error;
pub mod host;
pub mod kernel;
pub mod session;
pub mod surface;
pub mod transition;


pub use error::{DeviceError, DeviceResult};
pub use host::HostDevice;
pub use kernel::{NoopKernel, StepContext, StepKernel};
pub use session::DeviceSession;
pub use surface::DeviceSurface;
pub use transition::Transition;
