//! Writes to shared device state requested by a kernel.

use lc_core::MergedEdgeId;

/// A change to state shared between agents.
///
/// During the agent phase every kernel invocation sees the same step-`t`
/// edge and lane arrays.  Instead of writing them directly, the kernel
/// returns transitions; the device applies them after the barrier in
/// ascending agent-id order, so no agent can observe another agent's
/// step-`t+1` writes and the result does not depend on thread scheduling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// The agent moved onto `mid` (counts toward `upstream_count`).
    Enter { mid: MergedEdgeId },
    /// The agent left `mid` after `travel_steps` steps on it.
    Leave { mid: MergedEdgeId, travel_steps: u64 },
    /// Overwrite one lane cell.
    SetCell { index: u32, value: u8 },
}
