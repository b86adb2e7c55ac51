// SPDX-License-Identifier: MIT OR Apache-2.0
//! Workflow graph editor core for AutoFlow.
//!
//! This crate holds everything an interactive workflow diagram needs
//! short of the window itself:
//! - The workflow graph model (nodes, connections, invariants)
//! - Grid layout for freshly generated graphs
//! - The pointer state machine (move / connect modes)
//! - Projection to drawable primitives, and an egui painter for them
//! - Mermaid export
//!
//! ## Architecture
//!
//! [`WorkflowEditor`] is the entry point. Pointer events go in, the
//! [`InteractionController`] turns them into [`Graph`] mutations, and
//! [`render::project`] turns the result into a [`DrawList`]. Everything runs
//! on the caller's thread; listeners are notified synchronously.

pub mod connection;
pub mod editor;
pub mod error;
pub mod export;
pub mod graph;
pub mod interaction;
pub mod layout;
pub mod node;
pub mod paint;
pub mod render;
pub mod viewport;

pub use connection::{Edge, EdgeId};
pub use editor::{Subscription, WorkflowEditor};
pub use error::{GraphError, Result};
pub use graph::{Graph, WorkflowDefinition};
pub use interaction::{EditMode, InteractionController, InteractionState};
pub use node::{ConfigMap, Node, NodeId, NodeKind, NodeUpdate, Position};
pub use render::{DrawList, Primitive};
pub use viewport::Viewport;
