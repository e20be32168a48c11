//! Error types for the I/O-bound edges of the canvas core
//!
//! Graph mutations never fail; only mapping validation, backend calls and the
//! preview/polling orchestration carry an error channel.

use thiserror::Error;

/// Failures talking to the workflow backend.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Problems found while translating between the canvas graph and a workflow config.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MappingError {
    #[error("Edge '{edge_id}' references unknown node '{node_id}'")]
    DanglingEdge { edge_id: String, node_id: String },

    #[error("Workflow graph contains a cycle through node '{0}'")]
    Cycle(String),

    #[error("Step at index {0} has no step_id")]
    MissingStepId(usize),

    #[error("Step '{step_id}' has invalid parameters: {message}")]
    InvalidParameters { step_id: String, message: String },
}

/// Failures of remote canvas-session operations (load, preview, polling).
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Workflow graph is not runnable: {0}")]
    InvalidGraph(#[from] MappingError),

    #[error("Backend {stage} failed: {source}")]
    Backend {
        stage: &'static str,
        #[source]
        source: BackendError,
    },

    #[error("Backend saved the workflow but returned no workflow id")]
    MissingWorkflowId,

    #[error("Backend accepted the execution but returned no execution id")]
    MissingExecutionId,

    #[error("No execution is being tracked")]
    NotTracking,
}

impl SessionError {
    pub(crate) fn backend(stage: &'static str, source: BackendError) -> Self {
        Self::Backend { stage, source }
    }
}
