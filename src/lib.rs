//! Flowcanvas: workflow canvas editing core
//!
//! This library holds the state behind a visual workflow editor: an undoable
//! node/edge graph, the renderer-facing command surface, mapping to and from
//! the backend workflow schema, and preview execution tracking.

// Core configuration and setup
pub mod config;

// Error types for mapping, backend and session failures
pub mod error;

// Graph model - nodes, edges, snapshots and typed node payloads
pub mod workflow;

// Snapshot history with undo/redo
pub mod history;

// Canvas commands, change sets and view state
pub mod canvas;

// Canvas graph <-> backend workflow config translation
pub mod mapper;

// Backend collaborators - REST client and cached tool catalog
pub mod api;

// Execution tracking and status polling
pub mod runtime;

// Re-export commonly used types for external consumers
pub use api::{ExecutionStatus, HttpWorkflowBackend, WorkflowBackend, WorkflowRecord};
pub use canvas::{
    CanvasController, Connection, DropCommand, EdgeChange, NodeChange, NodeViewState, ViewIntent,
};
pub use config::Config;
pub use error::{BackendError, MappingError, SessionError};
pub use history::{CommitOptions, GraphHistoryStore};
pub use mapper::{WorkflowConfig, WorkflowMeta};
pub use runtime::{ExecutionPhase, ExecutionTracker};
pub use workflow::{Edge, Node, Position, SidePanelPayload, Snapshot};
