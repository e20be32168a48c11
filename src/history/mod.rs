//! Linear undo/redo history over canvas snapshots
//!
//! Every committed snapshot is an `Arc<Snapshot>` that is never mutated again,
//! so undo and redo restore prior states by reference.

use crate::workflow::Snapshot;
use std::sync::Arc;

/// Options for a single `commit`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOptions {
    /// Push the previous snapshot as an undo checkpoint and invalidate redo
    pub add_to_history: bool,
}

impl Default for CommitOptions {
    fn default() -> Self {
        Self {
            add_to_history: true,
        }
    }
}

impl CommitOptions {
    /// Checkpoint the previous snapshot so `undo` can return to it
    pub fn recorded() -> Self {
        Self {
            add_to_history: true,
        }
    }

    /// Replace the current snapshot without creating a checkpoint
    pub fn transient() -> Self {
        Self {
            add_to_history: false,
        }
    }

    /// `recorded` or `transient` depending on a settings flag
    pub fn recording(add_to_history: bool) -> Self {
        Self { add_to_history }
    }
}

/// Undo/redo-capable holder of the current canvas snapshot
///
/// `past` holds checkpoints oldest first; `future` holds undone snapshots with
/// the most recently undone last. No operation can fail: undo and redo at
/// either end of the history are silent no-ops.
#[derive(Debug, Clone, Default)]
pub struct GraphHistoryStore {
    past: Vec<Arc<Snapshot>>,
    present: Arc<Snapshot>,
    future: Vec<Arc<Snapshot>>,
}

impl GraphHistoryStore {
    /// Store rooted at `initial` with empty undo and redo stacks
    pub fn new(initial: Snapshot) -> Self {
        Self {
            past: Vec::new(),
            present: Arc::new(initial),
            future: Vec::new(),
        }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> &Arc<Snapshot> {
        &self.present
    }

    /// Whether a checkpoint exists to return to
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of checkpoints available to `undo`
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    /// Compute the next snapshot from the current one
    ///
    /// The updater sees the committed snapshot and must return a fresh value;
    /// the previous snapshot is kept intact for history.
    pub fn commit<F>(&mut self, updater: F, options: CommitOptions)
    where
        F: FnOnce(&Snapshot) -> Snapshot,
    {
        let next = Arc::new(updater(&self.present));
        if options.add_to_history {
            let previous = std::mem::replace(&mut self.present, next);
            self.past.push(previous);
            self.future.clear();
        } else {
            self.present = next;
        }
    }

    /// Restore the latest checkpoint, moving the current snapshot to redo
    pub fn undo(&mut self) {
        if let Some(previous) = self.past.pop() {
            let current = std::mem::replace(&mut self.present, previous);
            self.future.push(current);
        }
    }

    /// Re-apply the most recently undone snapshot
    pub fn redo(&mut self) {
        if let Some(next) = self.future.pop() {
            let current = std::mem::replace(&mut self.present, next);
            self.past.push(current);
        }
    }

    /// Drop all checkpoints and install `snapshot` as the new history root
    pub fn reset(&mut self, snapshot: Snapshot) {
        self.past.clear();
        self.future.clear();
        self.present = Arc::new(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{Node, NodeConfig, Position, SidePanelPayload};

    fn node(id: &str) -> Node {
        Node {
            id: id.to_string(),
            node_type: "command".to_string(),
            position: Position::default(),
            data: SidePanelPayload::new("agent", id, NodeConfig::Output { text: None }),
            selected: false,
            dimensions: None,
        }
    }

    fn push_node(store: &mut GraphHistoryStore, id: &str, options: CommitOptions) {
        let added = Arc::new(node(id));
        store.commit(
            |prev| {
                let mut next = prev.clone();
                next.nodes.push(added);
                next
            },
            options,
        );
    }

    #[test]
    fn undo_then_redo_walks_the_same_states() {
        let mut store = GraphHistoryStore::default();
        let s0 = Arc::clone(store.snapshot());
        push_node(&mut store, "a", CommitOptions::recorded());
        let s1 = Arc::clone(store.snapshot());
        push_node(&mut store, "b", CommitOptions::recorded());
        let s2 = Arc::clone(store.snapshot());

        store.undo();
        assert!(Arc::ptr_eq(store.snapshot(), &s1));
        store.undo();
        assert!(Arc::ptr_eq(store.snapshot(), &s0));
        assert!(!store.can_undo());

        store.redo();
        store.redo();
        assert!(Arc::ptr_eq(store.snapshot(), &s2));
        assert!(!store.can_redo());
    }

    #[test]
    fn boundaries_are_silent() {
        let mut store = GraphHistoryStore::default();
        store.undo();
        store.redo();
        assert!(store.snapshot().is_empty());
        assert!(!store.can_undo());
        assert!(!store.can_redo());
    }

    #[test]
    fn new_recorded_commit_clears_redo() {
        let mut store = GraphHistoryStore::default();
        push_node(&mut store, "a", CommitOptions::recorded());
        push_node(&mut store, "b", CommitOptions::recorded());
        store.undo();
        assert!(store.can_redo());

        push_node(&mut store, "c", CommitOptions::recorded());
        assert!(!store.can_redo());
        let before = Arc::clone(store.snapshot());
        store.redo();
        assert!(Arc::ptr_eq(store.snapshot(), &before));
    }

    #[test]
    fn transient_commits_are_skipped_by_undo() {
        let mut store = GraphHistoryStore::default();
        push_node(&mut store, "a", CommitOptions::recorded());
        push_node(&mut store, "b", CommitOptions::transient());
        push_node(&mut store, "c", CommitOptions::transient());
        assert_eq!(store.undo_depth(), 1);

        store.undo();
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn reset_discards_both_stacks() {
        let mut store = GraphHistoryStore::default();
        push_node(&mut store, "a", CommitOptions::recorded());
        push_node(&mut store, "b", CommitOptions::recorded());
        store.undo();

        store.reset(Snapshot::new(vec![node("x")], vec![]));
        assert!(!store.can_undo());
        assert!(!store.can_redo());
        assert!(store.snapshot().contains_node("x"));
    }
}
