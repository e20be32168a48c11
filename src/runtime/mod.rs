//! Execution runtime
//!
//! This module follows remote workflow executions started from the canvas:
//! - Lock-free tracking of the in-flight execution id
//! - Fixed-interval status polling with cancellation
//! - The per-execution phase the controller reports

// Tracked execution id (cancellation signal)
pub mod tracker;

// Status polling loop
pub mod poller;

pub use poller::{ExecutionPoller, PollOutcome};
pub use tracker::ExecutionTracker;

use serde::{Deserialize, Serialize};

/// Phase of the most recent preview run
///
/// `Idle -> Submitted -> Polling -> {Completed | Failed}`; a cancelled poll
/// returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionPhase {
    #[default]
    Idle,
    Submitted,
    Polling,
    Completed,
    Failed,
}

impl ExecutionPhase {
    pub fn is_active(self) -> bool {
        matches!(self, ExecutionPhase::Submitted | ExecutionPhase::Polling)
    }
}
