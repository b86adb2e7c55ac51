// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editing session facade.
//!
//! [`WorkflowEditor`] owns the graph, viewport and pointer state for one
//! editing session. It is the error boundary of the crate: misuse that the
//! UI can trigger (stale ids, double connects) is logged and ignored, and
//! the graph is left unmodified.
//!
//! Listeners registered with [`WorkflowEditor::subscribe`] run
//! synchronously, in registration order, after every mutating call and
//! after a drag is released. Pointer-moves during a drag update the model
//! without notifying.

use crate::connection::EdgeId;
use crate::graph::Graph;
use crate::interaction::{EditMode, InteractionController, InteractionEvent};
use crate::layout::apply_grid_layout;
use crate::node::{Node, NodeId, NodeKind, NodeUpdate};
use crate::render::{project, DrawList};
use crate::viewport::Viewport;
use egui::Pos2;

/// Where nodes added from the toolbar are dropped, canvas units
pub const NEW_NODE_POSITION: Pos2 = Pos2::new(300.0, 200.0);

/// Handle returned by [`WorkflowEditor::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Listener = Box<dyn FnMut(&Graph)>;

/// One editing session over a workflow graph
pub struct WorkflowEditor {
    graph: Graph,
    viewport: Viewport,
    interaction: InteractionController,
    listeners: Vec<(Subscription, Listener)>,
    next_subscription: u64,
    dirty: bool,
}

impl WorkflowEditor {
    /// Create an editor with an empty graph
    pub fn new() -> Self {
        Self::with_viewport(Viewport::new())
    }

    /// Create an editor with an empty graph and the given viewport
    pub fn with_viewport(viewport: Viewport) -> Self {
        Self {
            graph: Graph::new(),
            viewport,
            interaction: InteractionController::new(),
            listeners: Vec::new(),
            next_subscription: 0,
            dirty: false,
        }
    }

    /// Replace the current graph and lay out nodes without a position
    pub fn load_graph(&mut self, graph: Graph) {
        self.graph = graph;
        let placed = apply_grid_layout(&mut self.graph);
        self.interaction.reset();
        self.dirty = false;
        tracing::info!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            placed,
            "Loaded workflow graph"
        );
        self.notify();
    }

    /// Discard the current graph
    pub fn clear_graph(&mut self) {
        self.graph = Graph::new();
        self.interaction.reset();
        self.dirty = false;
        self.notify();
    }

    /// The graph being edited
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Current viewport
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Current pointer state and selection
    pub fn interaction(&self) -> &InteractionController {
        &self.interaction
    }

    /// Handle a pointer press at a screen position
    pub fn on_pointer_down(&mut self, screen_pos: Pos2) {
        let pos = self.viewport.screen_to_canvas(screen_pos);
        let abandoned = self.interaction.pointer_down(&self.graph, pos);
        self.finish_gesture(abandoned);
    }

    /// Handle pointer motion to a screen position
    pub fn on_pointer_move(&mut self, screen_pos: Pos2) {
        let pos = self.viewport.screen_to_canvas(screen_pos);
        self.interaction.pointer_move(&mut self.graph, pos);
    }

    /// Handle a pointer release at a screen position
    pub fn on_pointer_up(&mut self, screen_pos: Pos2) {
        let pos = self.viewport.screen_to_canvas(screen_pos);
        let event = self.interaction.pointer_up(&mut self.graph, pos);
        self.finish_gesture(event);
    }

    /// Abandon the current gesture, e.g. when the pointer leaves the canvas.
    /// A dragged node stays where it was last moved to.
    pub fn cancel_gesture(&mut self) {
        let event = self.interaction.cancel();
        self.finish_gesture(event);
    }

    fn finish_gesture(&mut self, event: Option<InteractionEvent>) {
        match event {
            Some(InteractionEvent::NodeMoved(node_id)) => {
                tracing::debug!(node = %node_id, "Node moved");
                self.changed();
            }
            Some(InteractionEvent::EdgeCreated(edge_id)) => {
                tracing::info!(edge = %edge_id, "Connection created");
                self.changed();
            }
            None => {}
        }
    }

    /// Current edit mode
    pub fn mode(&self) -> EditMode {
        self.interaction.mode()
    }

    /// Choose what the next pointer-down on a node starts
    pub fn set_mode(&mut self, mode: EditMode) {
        self.interaction.set_mode(mode);
    }

    /// Current zoom factor
    pub fn zoom(&self) -> f32 {
        self.viewport.zoom()
    }

    /// Change the zoom by `delta`, clamped to `[0.5, 2.0]`
    pub fn set_zoom(&mut self, delta: f32) {
        self.viewport.set_zoom(delta);
    }

    /// Zoom in one step
    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    /// Zoom out one step
    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    /// Back to 100%
    pub fn reset_zoom(&mut self) {
        self.viewport.reset_zoom();
    }

    /// The node shown in the details panel
    pub fn selected_node(&self) -> Option<&Node> {
        self.interaction.selected().and_then(|id| self.graph.node(id))
    }

    /// Select a node, or clear the selection with `None`
    pub fn select_node(&mut self, node_id: Option<NodeId>) {
        match node_id {
            Some(id) if !self.graph.contains_node(&id) => {
                tracing::debug!(node = %id, "Ignoring selection of unknown node");
            }
            other => self.interaction.select(other),
        }
    }

    /// Add a fresh node of `kind` at the drop position
    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let node = Node::new(NodeId::generate(), kind, format!("New {kind} node"))
            .with_description(format!("This is a new {kind} node"))
            .with_service("")
            .with_position(NEW_NODE_POSITION.x, NEW_NODE_POSITION.y);
        let id = node.id.clone();
        self.insert_node(node);
        id
    }

    /// Insert a prepared node. Returns false when its id is already taken.
    pub fn insert_node(&mut self, node: Node) -> bool {
        let id = node.id.clone();
        match self.graph.add_node(node) {
            Ok(()) => {
                apply_grid_layout(&mut self.graph);
                tracing::debug!(node = %id, "Node added");
                self.changed();
                true
            }
            Err(e) => {
                tracing::warn!("Failed to add node: {e}");
                false
            }
        }
    }

    /// Delete a node and its edges. Unknown ids are ignored.
    pub fn delete_node(&mut self, node_id: &NodeId) {
        if self.graph.remove_node(node_id).is_none() {
            tracing::debug!(node = %node_id, "Delete of unknown node ignored");
            return;
        }
        self.interaction.forget_node(node_id);
        tracing::debug!(node = %node_id, "Node deleted");
        self.changed();
    }

    /// Delete the selected node, if any
    pub fn delete_selected(&mut self) {
        if let Some(node_id) = self.interaction.selected().cloned() {
            self.delete_node(&node_id);
        }
    }

    /// Delete an edge. Unknown ids are ignored.
    pub fn delete_edge(&mut self, edge_id: &EdgeId) {
        if self.graph.remove_edge(edge_id).is_none() {
            tracing::debug!(edge = %edge_id, "Delete of unknown edge ignored");
            return;
        }
        tracing::debug!(edge = %edge_id, "Edge deleted");
        self.changed();
    }

    /// Delete the edge whose midpoint handle is under `screen_pos`.
    /// Returns the removed edge id.
    pub fn delete_edge_at(&mut self, screen_pos: Pos2) -> Option<EdgeId> {
        let edge_id = self.draw_list().handle_at(screen_pos).cloned()?;
        self.delete_edge(&edge_id);
        Some(edge_id)
    }

    /// Apply details-panel edits to a node. Unknown ids are ignored.
    pub fn update_node(&mut self, node_id: &NodeId, update: NodeUpdate) {
        if update.is_empty() {
            return;
        }
        match self.graph.update_node(node_id, update) {
            Ok(()) => self.changed(),
            Err(e) => tracing::warn!("Failed to update node: {e}"),
        }
    }

    /// Project the current state for drawing
    pub fn draw_list(&self) -> DrawList {
        project(&self.graph, &self.viewport, &self.interaction)
    }

    /// Register a change listener
    pub fn subscribe(&mut self, listener: impl FnMut(&Graph) + 'static) -> Subscription {
        let subscription = Subscription(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((subscription, Box::new(listener)));
        subscription
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(s, _)| *s != subscription);
        self.listeners.len() != before
    }

    /// Whether the graph changed since it was loaded or last saved
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Record that the current graph has been persisted
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    fn changed(&mut self) {
        self.dirty = true;
        self.notify();
    }

    fn notify(&mut self) {
        for (_, listener) in &mut self.listeners {
            listener(&self.graph);
        }
    }
}

impl Default for WorkflowEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WorkflowEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowEditor")
            .field("graph", &self.graph)
            .field("viewport", &self.viewport)
            .field("interaction", &self.interaction)
            .field("listeners", &self.listeners.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}
