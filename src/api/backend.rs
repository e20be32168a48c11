//! Collaborator contracts consumed by the canvas core
//!
//! The canvas never talks HTTP directly; it goes through these traits so hosts
//! and tests can supply their own implementations.

use crate::error::BackendError;
use crate::mapper::WorkflowConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Workflow as returned by the backend after save/update/load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRecord {
    /// Backend-assigned workflow id; absent or empty means the save is unusable
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub configuration: Option<WorkflowConfig>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl WorkflowRecord {
    /// Non-empty workflow id, if the backend returned one
    pub fn workflow_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Input supplied when starting an execution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOverrides {
    #[serde(default)]
    pub input_data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Execution handle returned by `execute`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionHandle {
    #[serde(default, alias = "execution_id")]
    pub id: Option<String>,
}

impl ExecutionHandle {
    pub fn execution_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Lifecycle state reported by the execution-status endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionState {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
    Timeout,
    #[serde(other)]
    Unknown,
}

impl ExecutionState {
    /// No further status changes will be reported
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ExecutionState::Completed
                | ExecutionState::Failed
                | ExecutionState::Cancelled
                | ExecutionState::Timeout
        )
    }
}

/// Per-step outcome of a remote execution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
    #[serde(default)]
    pub status: Option<String>,
    /// Step output; the computed value sits under `data`
    #[serde(default)]
    pub output_data: Value,
    #[serde(default)]
    pub error: Option<String>,
}

impl StepResult {
    /// The step's computed value (`output_data.data`)
    pub fn data(&self) -> Option<&Value> {
        self.output_data.get("data").filter(|v| !v.is_null())
    }
}

/// Polled execution status keyed by step (node) id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStatus {
    #[serde(default)]
    pub execution_id: Option<String>,
    pub status: ExecutionState,
    #[serde(default)]
    pub step_results: HashMap<String, StepResult>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Summary of a tool offered by the backend catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSummary {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters_schema: Value,
}

/// Persistence and execution collaborator
#[async_trait]
pub trait WorkflowBackend: Send + Sync {
    /// Create a workflow
    async fn save(&self, config: &WorkflowConfig) -> Result<WorkflowRecord, BackendError>;

    /// Replace an existing workflow's definition
    async fn update(
        &self,
        workflow_id: &str,
        config: &WorkflowConfig,
    ) -> Result<WorkflowRecord, BackendError>;

    /// Fetch a saved workflow
    async fn load(&self, workflow_id: &str) -> Result<WorkflowRecord, BackendError>;

    /// Start an execution of a saved workflow
    async fn execute(&self, workflow_id: &str, overrides: &ExecutionOverrides)
        -> Result<ExecutionHandle, BackendError>;

    /// Fetch the current status of an execution
    async fn poll(&self, execution_id: &str) -> Result<ExecutionStatus, BackendError>;
}

/// Source of the tool catalog shown in the node picker
#[async_trait]
pub trait ToolSource: Send + Sync {
    async fn list_tools(&self) -> Result<Vec<ToolSummary>, BackendError>;
}
