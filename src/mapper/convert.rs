//! Pure translation between canvas graphs and backend workflow configs
//!
//! `to_workflow_config` never mutates its inputs and produces identical output
//! for identical input. Selection, expansion and the new-item flag are session
//! state and are not persisted.

use crate::error::MappingError;
use crate::mapper::schema::{StepConfig, StepConnection, UiPosition, WorkflowConfig, WorkflowMeta};
use crate::workflow::{
    Category, Edge, EdgeData, Node, NodeConfig, NodeDetails, ParameterBinding, Position,
    SidePanelPayload, Snapshot, DEFAULT_EDGE_TYPE,
};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// Step config key holding the node's catalog id
pub const CATALOG_ID_KEY: &str = "catalog_id";
/// Step config key holding the node's rendering variant
pub const NODE_TYPE_KEY: &str = "node_type";

/// Serialize a canvas graph into a backend-submittable workflow config
pub fn to_workflow_config<N, E>(nodes: &[N], edges: &[E], meta: &WorkflowMeta) -> WorkflowConfig
where
    N: AsRef<Node>,
    E: AsRef<Edge>,
{
    let steps = nodes
        .iter()
        .map(|node| step_from_node(node.as_ref(), edges))
        .collect();

    let connections = edges
        .iter()
        .map(|edge| {
            let edge = edge.as_ref();
            StepConnection {
                source_step_id: edge.source.clone(),
                target_step_id: edge.target.clone(),
                source_handle: edge.source_handle.clone(),
                target_handle: edge.target_handle.clone(),
                connection_type: edge.action_type().to_string(),
                label: edge.data.as_ref().and_then(|d| d.label.clone()),
                animated: false,
            }
        })
        .collect();

    WorkflowConfig {
        name: meta.name.clone(),
        description: meta.description.clone(),
        version: meta.version.clone(),
        steps,
        global_config: BTreeMap::new(),
        tags: meta.tags.clone(),
        created_by: meta.created_by.clone(),
        connections,
    }
}

/// Convenience wrapper over `to_workflow_config` for a whole snapshot
pub fn snapshot_to_workflow_config(snapshot: &Snapshot, meta: &WorkflowMeta) -> WorkflowConfig {
    to_workflow_config(snapshot.nodes.as_slice(), snapshot.edges.as_slice(), meta)
}

fn step_from_node<E: AsRef<Edge>>(node: &Node, edges: &[E]) -> StepConfig {
    let traits = node.data.category().traits();

    // Every distinct upstream source is a dependency, in canvas edge order
    let mut dependencies: Vec<String> = Vec::new();
    for edge in edges.iter().map(|e| e.as_ref()).filter(|e| e.target == node.id) {
        if !dependencies.contains(&edge.source) {
            dependencies.push(edge.source.clone());
        }
    }

    let mut input_mapping = BTreeMap::new();
    if let NodeConfig::Tool { parameters, .. } = &node.data.config {
        for (name, binding) in parameters {
            if let ParameterBinding::Step { step_id, path } = binding {
                input_mapping.insert(name.clone(), Value::String(format!("{}.{}", step_id, path)));
            }
        }
    }

    let parameters = match serde_json::to_value(&node.data.config) {
        Ok(Value::Object(map)) => map.into_iter().collect(),
        _ => BTreeMap::new(),
    };

    let mut config = BTreeMap::new();
    config.insert(CATALOG_ID_KEY.to_string(), Value::String(node.data.id.clone()));
    config.insert(NODE_TYPE_KEY.to_string(), Value::String(node.node_type.clone()));

    StepConfig {
        step_id: Some(node.id.clone()),
        step_type: traits.step_type.to_string(),
        name: Some(node.data.label.clone()),
        dependencies,
        input_mapping,
        parameters,
        config,
        position: Some(UiPosition {
            x: node.position.x,
            y: node.position.y,
        }),
    }
}

/// Rebuild a canvas graph from a saved workflow config
///
/// Connections whose endpoints are missing are dropped. Workflows authored
/// without connections get edges synthesized from step dependencies.
pub fn from_workflow_config(config: &WorkflowConfig) -> Result<Snapshot, MappingError> {
    let mut nodes = Vec::with_capacity(config.steps.len());
    for (index, step) in config.steps.iter().enumerate() {
        nodes.push(node_from_step(index, step)?);
    }

    let known: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let mut edges = Vec::new();

    if config.connections.is_empty() {
        for step in &config.steps {
            let Some(target) = step.step_id.as_deref() else { continue };
            for source in &step.dependencies {
                if !known.contains(source.as_str()) {
                    tracing::warn!(
                        "Dropping dependency on unknown step '{}' of '{}'",
                        source,
                        target
                    );
                    continue;
                }
                edges.push(Edge {
                    id: format!("e-{}-{}-{}", source, target, edges.len()),
                    source: source.clone(),
                    target: target.to_string(),
                    source_handle: None,
                    target_handle: None,
                    data: None,
                    edge_type: DEFAULT_EDGE_TYPE.to_string(),
                    selected: false,
                });
            }
        }
    } else {
        for (index, conn) in config.connections.iter().enumerate() {
            let resolves = known.contains(conn.source_step_id.as_str())
                && known.contains(conn.target_step_id.as_str());
            if !resolves {
                tracing::warn!(
                    "Dropping connection {} -> {}: unknown step",
                    conn.source_step_id,
                    conn.target_step_id
                );
                continue;
            }
            let data = if conn.label.is_some() || conn.connection_type != "default" {
                Some(EdgeData {
                    label: conn.label.clone(),
                    action_type: Some(conn.connection_type.clone()),
                })
            } else {
                None
            };
            edges.push(Edge {
                id: format!("e-{}-{}-{}", conn.source_step_id, conn.target_step_id, index),
                source: conn.source_step_id.clone(),
                target: conn.target_step_id.clone(),
                source_handle: conn.source_handle.clone(),
                target_handle: conn.target_handle.clone(),
                data,
                edge_type: DEFAULT_EDGE_TYPE.to_string(),
                selected: false,
            });
        }
    }

    Ok(Snapshot::new(nodes, edges))
}

fn node_from_step(index: usize, step: &StepConfig) -> Result<Node, MappingError> {
    let step_id = step
        .step_id
        .clone()
        .filter(|id| !id.is_empty())
        .ok_or(MappingError::MissingStepId(index))?;

    let node_config = if step.parameters.contains_key("category") {
        let raw = Value::Object(step.parameters.clone().into_iter().collect());
        serde_json::from_value::<NodeConfig>(raw).map_err(|e| MappingError::InvalidParameters {
            step_id: step_id.clone(),
            message: e.to_string(),
        })?
    } else {
        let category = Category::from_step_type(&step.step_type).ok_or_else(|| {
            MappingError::InvalidParameters {
                step_id: step_id.clone(),
                message: format!("unsupported step type '{}'", step.step_type),
            }
        })?;
        NodeConfig::empty(category)
    };

    let catalog_id = step
        .config
        .get(CATALOG_ID_KEY)
        .and_then(Value::as_str)
        .unwrap_or(step.step_type.as_str())
        .to_string();
    let node_type = step
        .config
        .get(NODE_TYPE_KEY)
        .and_then(Value::as_str)
        .unwrap_or(node_config.category().traits().node_type)
        .to_string();
    let label = step.name.clone().unwrap_or_else(|| catalog_id.clone());
    let position = step
        .position
        .map(|p| Position::new(p.x, p.y))
        .unwrap_or_default();

    Ok(Node {
        id: step_id,
        node_type,
        position,
        data: SidePanelPayload {
            id: catalog_id,
            label,
            node_details: NodeDetails::default(),
            config: node_config,
        },
        selected: false,
        dimensions: None,
    })
}

/// Check that every edge resolves and the graph is acyclic
pub fn validate_graph(snapshot: &Snapshot) -> Result<(), MappingError> {
    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let mut index_of: HashMap<&str, NodeIndex> = HashMap::new();

    for node in &snapshot.nodes {
        index_of.insert(node.id.as_str(), graph.add_node(node.id.as_str()));
    }

    for edge in &snapshot.edges {
        let from = lookup(&index_of, edge, &edge.source)?;
        let to = lookup(&index_of, edge, &edge.target)?;
        graph.add_edge(from, to, ());
    }

    toposort(&graph, None)
        .map(|_| ())
        .map_err(|cycle| MappingError::Cycle(graph[cycle.node_id()].to_string()))
}

fn lookup(
    index_of: &HashMap<&str, NodeIndex>,
    edge: &Arc<Edge>,
    node_id: &str,
) -> Result<NodeIndex, MappingError> {
    index_of
        .get(node_id)
        .copied()
        .ok_or_else(|| MappingError::DanglingEdge {
            edge_id: edge.id.clone(),
            node_id: node_id.to_string(),
        })
}
