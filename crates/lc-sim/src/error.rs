use lc_core::CoreError;
use lc_device::DeviceError;
use lc_routing::AssignError;
use thiserror::Error;

use crate::ObserverError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("route assignment failed: {0}")]
    Assign(#[from] AssignError),

    #[error("device initialization failed: {source}")]
    DeviceInit { source: DeviceError },

    #[error("device step {step} failed at t = {time} s: {source}")]
    DeviceStep { time: f64, step: u64, source: DeviceError },

    #[error("checkpoint retrieval after step {step} failed at t = {time} s: {source}")]
    DeviceRetrieve { time: f64, step: u64, source: DeviceError },

    #[error("device finalization failed: {source}")]
    DeviceFinish { source: DeviceError },

    #[error("checkpoint observer failed at t = {time} s: {source}")]
    Observer { time: f64, source: ObserverError },
}

pub type SimResult<T> = Result<T, SimError>;
