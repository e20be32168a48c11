//! Change sets delivered by the renderer
//!
//! Node changes are classified into movement, selection and structural groups;
//! each group is committed separately so drags and clicks can stay out of undo
//! history.

use crate::workflow::{Dimensions, Edge, Node, Position};
use serde::{Deserialize, Serialize};

/// A single node change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeChange {
    Position {
        id: String,
        #[serde(default)]
        position: Option<Position>,
        #[serde(default)]
        dragging: bool,
    },
    Dimensions {
        id: String,
        dimensions: Dimensions,
    },
    Select {
        id: String,
        selected: bool,
    },
    Remove {
        id: String,
    },
    Add {
        node: Node,
    },
    Replace {
        node: Node,
    },
}

/// Grouping used to decide whether a change is recorded in history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeClass {
    Movement,
    Selection,
    Structural,
}

impl NodeChange {
    pub fn class(&self) -> ChangeClass {
        match self {
            NodeChange::Position { .. } | NodeChange::Dimensions { .. } => ChangeClass::Movement,
            NodeChange::Select { .. } => ChangeClass::Selection,
            NodeChange::Remove { .. } | NodeChange::Add { .. } | NodeChange::Replace { .. } => {
                ChangeClass::Structural
            }
        }
    }
}

/// A single edge change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EdgeChange {
    Add { edge: Edge },
    Remove { id: String },
    Select { id: String, selected: bool },
}

/// Request to connect two node handles
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub source_handle: Option<String>,
    #[serde(default)]
    pub target_handle: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub action_type: Option<String>,
}

impl Connection {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            ..Self::default()
        }
    }
}

/// Split node changes into (movement, selection, structural), preserving order
pub fn partition(changes: Vec<NodeChange>) -> (Vec<NodeChange>, Vec<NodeChange>, Vec<NodeChange>) {
    let mut movement = Vec::new();
    let mut selection = Vec::new();
    let mut structural = Vec::new();
    for change in changes {
        match change.class() {
            ChangeClass::Movement => movement.push(change),
            ChangeClass::Selection => selection.push(change),
            ChangeClass::Structural => structural.push(change),
        }
    }
    (movement, selection, structural)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_keeps_relative_order() {
        let changes = vec![
            NodeChange::Select {
                id: "a".into(),
                selected: true,
            },
            NodeChange::Position {
                id: "a".into(),
                position: Some(Position::new(1.0, 1.0)),
                dragging: true,
            },
            NodeChange::Remove { id: "b".into() },
            NodeChange::Position {
                id: "a".into(),
                position: Some(Position::new(2.0, 2.0)),
                dragging: false,
            },
        ];
        let (movement, selection, structural) = partition(changes);
        assert_eq!(movement.len(), 2);
        assert_eq!(selection.len(), 1);
        assert_eq!(structural, vec![NodeChange::Remove { id: "b".into() }]);
        assert!(matches!(
            movement[1],
            NodeChange::Position { dragging: false, .. }
        ));
    }

    #[test]
    fn changes_decode_from_renderer_json() {
        let change: NodeChange = serde_json::from_str(
            r#"{
                "type": "position",
                "id": "n1",
                "position": { "x": 4.0, "y": 2.0 },
                "dragging": true
            }"#,
        )
        .unwrap();
        assert_eq!(change.class(), ChangeClass::Movement);
    }
}
