//! Aggregate expand/collapse state of the canvas

use crate::workflow::Snapshot;
use serde::{Deserialize, Serialize};

/// Derived view state over all nodes' expansion flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeViewState {
    /// Every node collapsed
    Simple,
    /// Every node expanded
    Expanded,
    /// Some of each, or no nodes at all
    Mixed,
}

/// Requested expansion for `node_view_change`; absent means toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewIntent {
    /// Force expanded
    Max,
    /// Force collapsed
    Min,
}

impl NodeViewState {
    /// Recompute from the snapshot; never cached
    pub fn of(snapshot: &Snapshot) -> Self {
        if snapshot.nodes.is_empty() {
            return NodeViewState::Mixed;
        }
        let expanded = snapshot
            .nodes
            .iter()
            .filter(|n| n.data.node_details.is_expanded)
            .count();
        if expanded == snapshot.nodes.len() {
            NodeViewState::Expanded
        } else if expanded == 0 {
            NodeViewState::Simple
        } else {
            NodeViewState::Mixed
        }
    }
}

impl ViewIntent {
    /// Target expansion flag given the current one
    pub fn resolve(intent: Option<ViewIntent>, currently_expanded: bool) -> bool {
        match intent {
            Some(ViewIntent::Max) => true,
            Some(ViewIntent::Min) => false,
            None => !currently_expanded,
        }
    }
}
