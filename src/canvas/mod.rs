//! Canvas editing layer
//!
//! This module turns renderer events and UI intents into graph history:
//! - Viewport math for placing new nodes
//! - Renderer change sets (node/edge changes, connections)
//! - Drop commands from the node palette
//! - Derived expand/collapse view state
//! - Mapping execution results onto output nodes
//! - The `CanvasController` command surface tying it all together

// Screen/flow coordinate transform
pub mod viewport;

// Renderer change sets
pub mod changes;

// Palette drop decoding
pub mod drop;

// Aggregate node view state
pub mod view;

// Step result -> output node text
pub mod results;

// Command API over the history store
pub mod controller;

pub use changes::{partition, ChangeClass, Connection, EdgeChange, NodeChange};
pub use controller::CanvasController;
pub use drop::{DropCommand, DropKind};
pub use results::{apply_results, result_text, RESPONSE_FIELDS};
pub use view::{NodeViewState, ViewIntent};
pub use viewport::Viewport;
