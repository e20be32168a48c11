//! Core canvas graph type definitions
//!
//! Defines nodes, edges and the immutable `Snapshot` that the history store
//! versions. Node and edge entries are `Arc`-shared so that a new snapshot only
//! allocates for the entries a command actually touched.

use crate::workflow::payload::SidePanelPayload;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Rendering variant tag for edges created by the canvas
pub const DEFAULT_EDGE_TYPE: &str = "custom";

/// Canvas coordinate in flow space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Round both axes to the nearest multiple of `grid`
    pub fn snapped(self, grid: f64) -> Self {
        if grid <= 0.0 {
            return self;
        }
        Self {
            x: (self.x / grid).round() * grid,
            y: (self.y / grid).round() * grid,
        }
    }
}

/// Measured node size reported by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

/// A single vertex on the canvas
///
/// `id` is the graph-level identity; the catalog identity of what the node
/// represents lives in `data.id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique node identifier within the graph
    pub id: String,
    /// Rendering variant tag (e.g., "command")
    #[serde(rename = "type")]
    pub node_type: String,
    /// Canvas position in flow coordinates
    pub position: Position,
    /// Category-specific payload shown in the side panel
    pub data: SidePanelPayload,
    /// Transient selection flag
    #[serde(default)]
    pub selected: bool,
    /// Transient renderer measurement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
}

/// Optional metadata carried by an edge
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Connection semantics (e.g., "default", "conditional", "error")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
}

/// Directed connection between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Unique edge identifier
    pub id: String,
    /// Source node ID
    pub source: String,
    /// Target node ID
    pub target: String,
    /// Sub-port on the source node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    /// Sub-port on the target node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<EdgeData>,
    /// Rendering variant tag
    #[serde(rename = "type")]
    pub edge_type: String,
    /// Transient selection flag
    #[serde(default)]
    pub selected: bool,
}

impl Edge {
    /// Whether this edge starts or ends at `node_id`
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }

    /// Connection type used by the backend, defaulting to "default"
    pub fn action_type(&self) -> &str {
        self.data
            .as_ref()
            .and_then(|d| d.action_type.as_deref())
            .unwrap_or("default")
    }
}

/// One immutable point in canvas history
///
/// Snapshots are never mutated after they are committed; commands build a new
/// snapshot that shares every untouched node and edge with its predecessor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub nodes: Vec<Arc<Node>>,
    pub edges: Vec<Arc<Edge>>,
}

impl Snapshot {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self {
            nodes: nodes.into_iter().map(Arc::new).collect(),
            edges: edges.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, node_id: &str) -> Option<&Arc<Node>> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    pub fn edge(&self, edge_id: &str) -> Option<&Arc<Edge>> {
        self.edges.iter().find(|e| e.id == edge_id)
    }

    pub fn contains_node(&self, node_id: &str) -> bool {
        self.node(node_id).is_some()
    }

    /// Edges whose source or target is `node_id`
    pub fn edges_touching<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a Arc<Edge>> + 'a {
        self.edges.iter().filter(move |e| e.touches(node_id))
    }

    /// Edges pointing into `node_id`, in canvas order
    pub fn incoming<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Arc<Edge>> + 'a {
        self.edges.iter().filter(move |e| e.target == node_id)
    }

    /// Nodes currently flagged as selected
    pub fn selected_nodes(&self) -> impl Iterator<Item = &Arc<Node>> {
        self.nodes.iter().filter(|n| n.selected)
    }
}
