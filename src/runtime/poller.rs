//! Fixed-interval execution status polling
//!
//! Polls until the backend reports a terminal status or the tracked execution
//! id is cleared. Responses that arrive after cancellation are discarded.

use crate::api::{ExecutionStatus, WorkflowBackend};
use crate::error::SessionError;
use crate::runtime::tracker::ExecutionTracker;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// How a polling run ended
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Backend reported a terminal status
    Terminal(ExecutionStatus),
    /// Tracked id was cleared or replaced before a terminal status arrived
    Cancelled,
}

/// Polls one execution at a fixed interval
pub struct ExecutionPoller {
    backend: Arc<dyn WorkflowBackend>,
    tracker: ExecutionTracker,
    interval: Duration,
}

impl ExecutionPoller {
    pub fn new(
        backend: Arc<dyn WorkflowBackend>,
        tracker: ExecutionTracker,
        interval: Duration,
    ) -> Self {
        Self {
            backend,
            tracker,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Poll `execution_id` until it reaches a terminal status or is cancelled
    ///
    /// A failed poll clears the tracked id and returns the error. A terminal
    /// status also clears it, since nothing is left in flight.
    pub async fn run(&self, execution_id: &str) -> Result<PollOutcome, SessionError> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut polls: u64 = 0;

        loop {
            ticker.tick().await;

            if !self.tracker.is_tracking(execution_id) {
                tracing::debug!(
                    "⏹️ Polling for {} cancelled after {} polls",
                    execution_id,
                    polls
                );
                return Ok(PollOutcome::Cancelled);
            }

            polls += 1;
            let status = match self.backend.poll(execution_id).await {
                Ok(status) => status,
                Err(e) => {
                    tracing::error!("❌ Status poll for {} failed: {}", execution_id, e);
                    self.tracker.clear_if(execution_id);
                    return Err(SessionError::backend("poll", e));
                }
            };

            if !self.tracker.is_tracking(execution_id) {
                tracing::warn!(
                    "Discarding status for {} received after cancellation",
                    execution_id
                );
                return Ok(PollOutcome::Cancelled);
            }

            tracing::debug!("🔄 Poll #{} for {}: {:?}", polls, execution_id, status.status);

            if status.status.is_terminal() {
                tracing::info!(
                    "✅ Execution {} finished with {:?} after {} polls",
                    execution_id,
                    status.status,
                    polls
                );
                self.tracker.clear_if(execution_id);
                return Ok(PollOutcome::Terminal(status));
            }
        }
    }

    /// Poll and hand the terminal status to `on_terminal`, which runs at most once
    ///
    /// Returns whether the callback ran.
    pub async fn run_with<F>(
        &self,
        execution_id: &str,
        on_terminal: F,
    ) -> Result<bool, SessionError>
    where
        F: FnOnce(ExecutionStatus),
    {
        match self.run(execution_id).await? {
            PollOutcome::Terminal(status) => {
                on_terminal(status);
                Ok(true)
            }
            PollOutcome::Cancelled => Ok(false),
        }
    }

    /// Run `run_with` on a background task
    pub fn spawn_watch<F>(
        self: Arc<Self>,
        execution_id: String,
        on_terminal: F,
    ) -> JoinHandle<Result<bool, SessionError>>
    where
        F: FnOnce(ExecutionStatus) + Send + 'static,
    {
        tokio::spawn(async move { self.run_with(&execution_id, on_terminal).await })
    }
}
