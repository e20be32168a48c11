//! Typed drop commands
//!
//! The renderer serializes whatever was dragged from the palette into a
//! `{kind, payload}` command and hands it to the controller. Anything that does
//! not decode is discarded.

use crate::api::ToolSummary;
use crate::workflow::{NodeConfig, SidePanelPayload};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// What was dragged onto the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropKind {
    /// A full side-panel payload from the node palette
    CatalogItem,
    /// A tool entry from the tool catalog
    Tool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropCommand {
    pub kind: DropKind,
    pub payload: Value,
}

impl DropCommand {
    pub fn new(kind: DropKind, payload: Value) -> Self {
        Self { kind, payload }
    }

    /// Decode a raw drag payload; malformed input yields `None`
    pub fn parse(raw: &str) -> Option<Self> {
        match serde_json::from_str(raw) {
            Ok(command) => Some(command),
            Err(e) => {
                tracing::warn!("Discarding malformed drop payload: {}", e);
                None
            }
        }
    }

    /// Node payload to create for this drop
    pub fn into_payload(self) -> Option<SidePanelPayload> {
        let decoded = match self.kind {
            DropKind::CatalogItem => serde_json::from_value::<SidePanelPayload>(self.payload),
            DropKind::Tool => serde_json::from_value::<ToolSummary>(self.payload).map(|tool| {
                SidePanelPayload::new(
                    tool.name.clone(),
                    tool.name.clone(),
                    NodeConfig::Tool {
                        tool_name: tool.name,
                        parameters: BTreeMap::new(),
                    },
                )
            }),
        };

        match decoded {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::warn!("Discarding {:?} drop with unusable payload: {}", self.kind, e);
                None
            }
        }
    }
}
