//! Backend workflow schema
//!
//! Mirrors the workflow service's creation/edit payload: steps with their
//! dependencies and UI position, plus visual connections between steps.
//! Maps are `BTreeMap` so serialization order is stable.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Workflow metadata kept alongside the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowMeta {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

impl WorkflowMeta {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            version: default_version(),
            tags: Vec::new(),
            created_by: None,
        }
    }
}

impl Default for WorkflowMeta {
    fn default() -> Self {
        Self::named("Untitled workflow")
    }
}

/// Canvas position persisted with a step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UiPosition {
    pub x: f64,
    pub y: f64,
}

/// One executable step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepConfig {
    pub step_id: Option<String>,
    pub step_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Step ids whose outputs this step consumes
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Parameter name -> "step_id.path" reference into an upstream output
    #[serde(default)]
    pub input_mapping: BTreeMap<String, Value>,
    /// Category-specific configuration (tagged with its category)
    #[serde(default)]
    pub parameters: BTreeMap<String, Value>,
    /// Editor metadata needed to rebuild the node (catalog id, node type)
    #[serde(default)]
    pub config: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<UiPosition>,
}

/// Visual connection between two steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepConnection {
    pub source_step_id: String,
    pub target_step_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    #[serde(default = "default_connection_type")]
    pub connection_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub animated: bool,
}

fn default_connection_type() -> String {
    "default".to_string()
}

/// Backend-submittable workflow definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_version")]
    pub version: String,
    pub steps: Vec<StepConfig>,
    #[serde(default)]
    pub global_config: BTreeMap<String, Value>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default)]
    pub connections: Vec<StepConnection>,
}

impl WorkflowConfig {
    pub fn meta(&self) -> WorkflowMeta {
        WorkflowMeta {
            name: self.name.clone(),
            description: self.description.clone(),
            version: self.version.clone(),
            tags: self.tags.clone(),
            created_by: self.created_by.clone(),
        }
    }
}
