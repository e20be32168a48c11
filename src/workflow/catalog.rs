//! Node categories and the catalog lookups keyed by them
//!
//! Category-specific behaviour (icon, color, editable fields, backend step type)
//! is a static table keyed by `Category` instead of being inferred from
//! whichever optional fields a payload happens to carry.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Catalog ids of the built-in output nodes
pub const OUTPUT_NODE_IDS: &[&str] = &["text_output", "chat_output", "file_output", "output"];

/// Node category, serialized as the payload config tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Input,
    Agent,
    Prompt,
    Tool,
    Output,
}

/// Static presentation and mapping data for a category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTraits {
    pub icon: &'static str,
    pub color: &'static str,
    /// Side-panel fields the user may edit
    pub editable_fields: &'static [&'static str],
    /// Rendering variant tag for new nodes
    pub node_type: &'static str,
    /// Backend step type the category maps to
    pub step_type: &'static str,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Input,
        Category::Agent,
        Category::Prompt,
        Category::Tool,
        Category::Output,
    ];

    pub fn traits(self) -> CategoryTraits {
        match self {
            Category::Input => CategoryTraits {
                icon: "play",
                color: "#16a34a",
                editable_fields: &["label", "kind"],
                node_type: "command",
                step_type: "trigger",
            },
            Category::Agent => CategoryTraits {
                icon: "bot",
                color: "#7c3aed",
                editable_fields: &["label", "agent_id", "model", "system_prompt"],
                node_type: "command",
                step_type: "agent_execution",
            },
            Category::Prompt => CategoryTraits {
                icon: "message-square",
                color: "#2563eb",
                editable_fields: &["label", "prompt_id", "query_template"],
                node_type: "command",
                step_type: "prompt",
            },
            Category::Tool => CategoryTraits {
                icon: "wrench",
                color: "#ea580c",
                editable_fields: &["label", "tool_name", "parameters"],
                node_type: "command",
                step_type: "tool_execution",
            },
            Category::Output => CategoryTraits {
                icon: "file-text",
                color: "#0891b2",
                editable_fields: &["label"],
                node_type: "command",
                step_type: "data_processing",
            },
        }
    }

    /// Reverse lookup from a backend step type
    pub fn from_step_type(step_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.traits().step_type == step_type)
    }
}

/// Decides which catalog ids receive execution results
pub trait OutputCatalog: Send + Sync {
    fn is_output(&self, catalog_id: &str) -> bool;
}

/// Fixed set of output catalog ids
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    output_ids: HashSet<String>,
}

impl StaticCatalog {
    pub fn new<I, S>(output_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            output_ids: output_ids.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::new(OUTPUT_NODE_IDS.iter().copied())
    }
}

impl OutputCatalog for StaticCatalog {
    fn is_output(&self, catalog_id: &str) -> bool {
        self.output_ids.contains(catalog_id)
    }
}
