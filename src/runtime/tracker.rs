//! Lock-free holder of the execution id currently being followed
//!
//! Publishing or clearing the id is an atomic pointer swap, so the poller can
//! check it between awaits without coordinating with the controller. Clearing
//! the id is the cancellation signal.

use arc_swap::ArcSwapOption;
use std::sync::Arc;

/// Shared handle to the tracked execution id
#[derive(Debug, Clone, Default)]
pub struct ExecutionTracker {
    current: Arc<ArcSwapOption<String>>,
}

impl ExecutionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `execution_id`, replacing any previous one
    pub fn track(&self, execution_id: impl Into<String>) {
        self.current.store(Some(Arc::new(execution_id.into())));
    }

    /// Stop tracking; pollers observe this as cancellation
    pub fn clear(&self) {
        self.current.store(None);
    }

    /// Clear only if `execution_id` is still the tracked one
    pub fn clear_if(&self, execution_id: &str) {
        let current = self.current.load();
        if current.as_deref().map(String::as_str) == Some(execution_id) {
            self.current.compare_and_swap(&current, None::<Arc<String>>);
        }
    }

    pub fn current(&self) -> Option<String> {
        self.current.load_full().map(|id| (*id).clone())
    }

    pub fn is_tracking(&self, execution_id: &str) -> bool {
        self.current.load().as_deref().map(String::as_str) == Some(execution_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_same_slot() {
        let tracker = ExecutionTracker::new();
        let poller_view = tracker.clone();

        tracker.track("ex-1");
        assert!(poller_view.is_tracking("ex-1"));

        tracker.clear();
        assert!(!poller_view.is_tracking("ex-1"));
        assert_eq!(poller_view.current(), None);
    }

    #[test]
    fn clear_if_ignores_newer_executions() {
        let tracker = ExecutionTracker::new();
        tracker.track("ex-2");
        tracker.clear_if("ex-1");
        assert_eq!(tracker.current().as_deref(), Some("ex-2"));

        tracker.clear_if("ex-2");
        assert_eq!(tracker.current(), None);
    }
}
