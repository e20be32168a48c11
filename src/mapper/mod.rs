//! Workflow mapping layer
//!
//! Translates between the canvas graph and the backend's persisted workflow
//! schema (steps, dependencies, positions, connections).

// Backend workflow schema types
pub mod schema;

// Pure graph <-> config conversion and validation
pub mod convert;

pub use convert::{
    from_workflow_config, snapshot_to_workflow_config, to_workflow_config, validate_graph,
};
pub use schema::{StepConfig, StepConnection, UiPosition, WorkflowConfig, WorkflowMeta};
