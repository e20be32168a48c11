//! Canvas graph <-> workflow config translation and graph validation.
mod common;

use common::{agent, edge, node_with, output, payload};
use flowcanvas::mapper::{
    from_workflow_config, snapshot_to_workflow_config, validate_graph, StepConfig, WorkflowConfig,
    WorkflowMeta,
};
use flowcanvas::workflow::{EdgeData, NodeConfig, ParameterBinding, Position, Snapshot};
use flowcanvas::MappingError;
use serde_json::{json, Value};
use std::collections::BTreeMap;

fn research_graph() -> Snapshot {
    let mut search = node_with(
        "search",
        payload(
            "web_search",
            NodeConfig::Tool {
                tool_name: "web_search".to_string(),
                parameters: BTreeMap::from([
                    (
                        "query".to_string(),
                        ParameterBinding::Step {
                            step_id: "planner".to_string(),
                            path: "data.response".to_string(),
                        },
                    ),
                    (
                        "limit".to_string(),
                        ParameterBinding::Literal { value: json!(5) },
                    ),
                ]),
            },
        ),
    );
    search.position = Position::new(240.0, 80.0);
    search.selected = true;
    search.data.node_details.is_expanded = false;

    let mut conditional = edge("e2", "search", "report");
    conditional.data = Some(EdgeData {
        label: Some("found".to_string()),
        action_type: Some("conditional".to_string()),
    });

    Snapshot::new(
        vec![agent("planner"), search, output("report")],
        vec![edge("e1", "planner", "search"), conditional, edge("e3", "planner", "report")],
    )
}

fn step<'a>(config: &'a WorkflowConfig, id: &str) -> &'a StepConfig {
    config
        .steps
        .iter()
        .find(|s| s.step_id.as_deref() == Some(id))
        .unwrap()
}

#[test]
fn test_mapping_is_deterministic_and_leaves_input_alone() {
    let graph = research_graph();
    let copy = graph.clone();
    let meta = WorkflowMeta::named("Research");

    let first = snapshot_to_workflow_config(&graph, &meta);
    let second = snapshot_to_workflow_config(&graph, &meta);
    assert_eq!(first, second);
    assert_eq!(graph, copy);
}

#[test]
fn test_steps_carry_identity_position_and_configuration() {
    let config = snapshot_to_workflow_config(&research_graph(), &WorkflowMeta::named("Research"));
    assert_eq!(config.name, "Research");
    assert_eq!(config.version, "1.0.0");
    assert_eq!(config.steps.len(), 3);

    let search = step(&config, "search");
    assert_eq!(search.step_type, "tool_execution");
    assert_eq!(search.config.get("catalog_id"), Some(&json!("web_search")));
    assert_eq!(search.position.map(|p| (p.x, p.y)), Some((240.0, 80.0)));
    assert_eq!(search.parameters.get("category"), Some(&json!("tool")));
    assert_eq!(search.parameters.get("tool_name"), Some(&json!("web_search")));
    assert_eq!(
        search.input_mapping.get("query"),
        Some(&Value::String("planner.data.response".to_string()))
    );
    assert!(!search.input_mapping.contains_key("limit"));
}

#[test]
fn test_transient_flags_are_not_persisted() {
    let config = snapshot_to_workflow_config(&research_graph(), &WorkflowMeta::default());
    let raw = serde_json::to_string(&config).unwrap();
    let transient = [
        "selected",
        "isExpanded",
        "is_expanded",
        "isNewItem",
        "is_new_item",
        "nodeDetails",
    ];
    for field in transient {
        assert!(!raw.contains(field), "persisted transient field {}", field);
    }
}

#[test]
fn test_dependencies_list_every_upstream_source() {
    let config = snapshot_to_workflow_config(&research_graph(), &WorkflowMeta::default());
    assert_eq!(step(&config, "report").dependencies, vec!["search", "planner"]);
    assert_eq!(step(&config, "search").dependencies, vec!["planner"]);
    assert!(step(&config, "planner").dependencies.is_empty());
}

#[test]
fn test_connections_keep_handles_and_types() {
    let config = snapshot_to_workflow_config(&research_graph(), &WorkflowMeta::default());
    assert_eq!(config.connections.len(), 3);
    let conditional = &config.connections[1];
    assert_eq!(conditional.source_step_id, "search");
    assert_eq!(conditional.target_step_id, "report");
    assert_eq!(conditional.connection_type, "conditional");
    assert_eq!(conditional.label.as_deref(), Some("found"));
    assert_eq!(config.connections[0].connection_type, "default");
}

#[test]
fn test_saved_config_rebuilds_the_graph() {
    let graph = research_graph();
    let config = snapshot_to_workflow_config(&graph, &WorkflowMeta::default());
    let rebuilt = from_workflow_config(&config).unwrap();

    assert_eq!(rebuilt.nodes.len(), 3);
    for original in &graph.nodes {
        let node = rebuilt.node(&original.id).unwrap();
        assert_eq!(node.position, original.position);
        assert_eq!(node.data.id, original.data.id);
        assert_eq!(node.data.label, original.data.label);
        assert_eq!(node.data.config, original.data.config);
        assert!(!node.selected);
        assert!(node.data.node_details.is_expanded);
    }

    let pairs: Vec<(&str, &str, &str)> = rebuilt
        .edges
        .iter()
        .map(|e| (e.source.as_str(), e.target.as_str(), e.action_type()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("planner", "search", "default"),
            ("search", "report", "conditional"),
            ("planner", "report", "default"),
        ]
    );
}

#[test]
fn test_dependencies_become_edges_without_connections() {
    let mut config = snapshot_to_workflow_config(&research_graph(), &WorkflowMeta::default());
    config.connections.clear();
    let rebuilt = from_workflow_config(&config).unwrap();
    assert_eq!(rebuilt.edges.len(), 3);
    assert_eq!(rebuilt.incoming("report").count(), 2);
}

#[test]
fn test_unknown_connection_endpoints_are_dropped() {
    let mut config = snapshot_to_workflow_config(&research_graph(), &WorkflowMeta::default());
    config.connections[0].target_step_id = "ghost".to_string();
    let rebuilt = from_workflow_config(&config).unwrap();
    assert_eq!(rebuilt.edges.len(), 2);
}

#[test]
fn test_steps_without_parameters_fall_back_to_step_type() {
    let config: WorkflowConfig = serde_json::from_value(json!({
        "name": "legacy",
        "steps": [
            { "step_id": "s1", "step_type": "agent_execution", "name": "Agent" },
            { "step_id": "s2", "step_type": "data_processing", "dependencies": ["s1"] }
        ]
    }))
    .unwrap();
    let rebuilt = from_workflow_config(&config).unwrap();
    assert_eq!(
        rebuilt.node("s1").unwrap().data.config,
        NodeConfig::Agent {
            agent_id: None,
            model: None,
            system_prompt: None
        }
    );
    assert_eq!(rebuilt.node("s2").unwrap().data.label, "data_processing");
    assert_eq!(rebuilt.edges.len(), 1);
}

#[test]
fn test_bad_steps_are_rejected() {
    let missing_id: WorkflowConfig = serde_json::from_value(json!({
        "name": "broken",
        "steps": [{ "step_id": null, "step_type": "prompt" }]
    }))
    .unwrap();
    assert_eq!(from_workflow_config(&missing_id), Err(MappingError::MissingStepId(0)));

    let unknown_type: WorkflowConfig = serde_json::from_value(json!({
        "name": "broken",
        "steps": [{ "step_id": "s1", "step_type": "teleport" }]
    }))
    .unwrap();
    assert!(matches!(
        from_workflow_config(&unknown_type),
        Err(MappingError::InvalidParameters { step_id, .. }) if step_id == "s1"
    ));
}

#[test]
fn test_validation_rejects_cycles_and_dangling_edges() {
    assert_eq!(validate_graph(&research_graph()), Ok(()));

    let cyclic = Snapshot::new(
        vec![agent("A"), agent("B")],
        vec![edge("e1", "A", "B"), edge("e2", "B", "A")],
    );
    assert!(matches!(validate_graph(&cyclic), Err(MappingError::Cycle(_))));

    let dangling = Snapshot::new(vec![agent("A")], vec![edge("e1", "A", "ghost")]);
    assert_eq!(
        validate_graph(&dangling),
        Err(MappingError::DanglingEdge {
            edge_id: "e1".to_string(),
            node_id: "ghost".to_string()
        })
    );
}
