//! Side-panel payload carried by every canvas node
//!
//! The category-specific configuration is a tagged union so each category
//! declares exactly the fields it needs. The serialized tag doubles as the
//! node's category id.

use crate::workflow::catalog::Category;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Node data payload shown and edited in the side panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidePanelPayload {
    /// Catalog id (e.g., "web_search", "text_output"), distinct from the graph node id
    pub id: String,
    /// Display name
    pub label: String,
    /// Transient presentation state
    #[serde(default)]
    pub node_details: NodeDetails,
    /// Category-specific configuration
    pub config: NodeConfig,
}

/// Presentation flags for a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDetails {
    /// Node was created in this session and not yet persisted
    #[serde(default)]
    pub is_new_item: bool,
    /// Node renders its full detail view
    #[serde(default = "default_expanded")]
    pub is_expanded: bool,
}

fn default_expanded() -> bool {
    true
}

impl Default for NodeDetails {
    fn default() -> Self {
        Self {
            is_new_item: false,
            is_expanded: true,
        }
    }
}

/// Category-specific node configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum NodeConfig {
    /// Workflow entry point
    /// Backend trigger kind: "webhook", "chat" or "file"
    Input {
        #[serde(default = "default_trigger_kind")]
        kind: String,
    },

    /// Agent invocation
    Agent {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        agent_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        system_prompt: Option<String>,
    },

    /// Prompt template reference
    Prompt {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prompt_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        query_template: Option<String>,
    },

    /// Tool call with per-parameter bindings
    Tool {
        tool_name: String,
        #[serde(default)]
        parameters: BTreeMap<String, ParameterBinding>,
    },

    /// Terminal node that displays a run's result
    Output {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
}

fn default_trigger_kind() -> String {
    "webhook".to_string()
}

/// Where a tool parameter gets its value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ParameterBinding {
    /// Fixed value entered in the side panel
    Literal { value: Value },
    /// Field of an upstream step's output (e.g., step "n1", path "data.response")
    Step { step_id: String, path: String },
}

impl NodeConfig {
    pub fn category(&self) -> Category {
        match self {
            NodeConfig::Input { .. } => Category::Input,
            NodeConfig::Agent { .. } => Category::Agent,
            NodeConfig::Prompt { .. } => Category::Prompt,
            NodeConfig::Tool { .. } => Category::Tool,
            NodeConfig::Output { .. } => Category::Output,
        }
    }

    /// Empty configuration for a category, used when the catalog supplies no template
    pub fn empty(category: Category) -> Self {
        match category {
            Category::Input => NodeConfig::Input {
                kind: default_trigger_kind(),
            },
            Category::Agent => NodeConfig::Agent {
                agent_id: None,
                model: None,
                system_prompt: None,
            },
            Category::Prompt => NodeConfig::Prompt {
                prompt_id: None,
                query_template: None,
            },
            Category::Tool => NodeConfig::Tool {
                tool_name: String::new(),
                parameters: BTreeMap::new(),
            },
            Category::Output => NodeConfig::Output { text: None },
        }
    }
}

impl SidePanelPayload {
    pub fn new(id: impl Into<String>, label: impl Into<String>, config: NodeConfig) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            node_details: NodeDetails::default(),
            config,
        }
    }

    pub fn category(&self) -> Category {
        self.config.category()
    }

    /// Text currently shown by an output node
    pub fn output_text(&self) -> Option<&str> {
        match &self.config {
            NodeConfig::Output { text } => text.as_deref(),
            _ => None,
        }
    }

    /// Replace the text of an output node; returns false for other categories
    pub fn set_output_text(&mut self, value: String) -> bool {
        match &mut self.config {
            NodeConfig::Output { text } => {
                *text = Some(value);
                true
            }
            _ => false,
        }
    }
}
