//! Backend collaborator layer
//!
//! This module defines what the canvas core needs from the outside world and
//! provides the default HTTP implementation:
//! - Persistence, execution and status contracts
//! - reqwest-based REST client
//! - TTL cache with an injected clock, and the cached tool directory

// Collaborator traits and wire types
pub mod backend;

// REST client for the workflow service
pub mod client;

// Expiring cache primitives
pub mod cache;

// Cached tool catalog
pub mod tools;

pub use backend::{
    ExecutionHandle, ExecutionOverrides, ExecutionState, ExecutionStatus, StepResult, ToolSource,
    ToolSummary, WorkflowBackend, WorkflowRecord,
};
pub use cache::{Clock, ManualClock, SystemClock, TtlCache};
pub use client::HttpWorkflowBackend;
pub use tools::ToolDirectory;
