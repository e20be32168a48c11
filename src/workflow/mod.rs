//! Canvas graph model
//!
//! This module holds the in-memory representation the canvas edits:
//! - Graph types (Node, Edge, Snapshot)
//! - The typed side-panel payload each node carries
//! - Category lookup table and the output-node catalog

// Graph vertex/edge/snapshot definitions
pub mod types;

// Category-tagged node payloads
pub mod payload;

// Category traits and output catalog
pub mod catalog;

pub use catalog::{Category, CategoryTraits, OutputCatalog, StaticCatalog};
pub use payload::{NodeConfig, NodeDetails, ParameterBinding, SidePanelPayload};
pub use types::{DEFAULT_EDGE_TYPE, Dimensions, Edge, EdgeData, Node, Position, Snapshot};
