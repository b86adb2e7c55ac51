// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pointer interaction state machine.
//!
//! The controller sits between raw pointer events and the graph model:
//! - `Idle`: nothing held
//! - `DraggingNode`: a node follows the pointer, keeping its grab offset
//! - `DrawingConnection`: a preview edge follows the pointer until release
//!
//! All coordinates handled here are canvas units. Hit-tests never fail;
//! a miss simply leaves the graph untouched.

use crate::connection::{Edge, EdgeId, DEFAULT_EDGE_LABEL};
use crate::graph::Graph;
use crate::node::NodeId;
use crate::viewport::{node_rect, HIT_TOLERANCE};
use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};

/// What a pointer-down on a node starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    /// Drag nodes around
    #[default]
    Move,
    /// Draw connections between nodes
    Connect,
}

/// Pointer state
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InteractionState {
    /// No pointer button held
    #[default]
    Idle,
    /// Dragging a node
    DraggingNode {
        /// Node being dragged
        node_id: NodeId,
        /// Pointer minus node top-left at grab time
        grab_offset: Vec2,
    },
    /// Drawing a connection out of a node
    DrawingConnection {
        /// Node the connection starts at
        source_id: NodeId,
        /// Live pointer position
        cursor: Pos2,
    },
}

impl InteractionState {
    /// Check whether no gesture is in progress
    pub fn is_idle(&self) -> bool {
        matches!(self, InteractionState::Idle)
    }
}

/// Graph-changing result of a pointer release
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    /// A drag ended; the node keeps its last position
    NodeMoved(NodeId),
    /// A connection was drawn
    EdgeCreated(EdgeId),
}

/// Topmost node whose box contains `pos`
pub fn node_at(graph: &Graph, pos: Pos2) -> Option<&NodeId> {
    node_at_with_tolerance(graph, pos, 0.0)
}

/// Topmost node whose box, grown by `tolerance` on every side, contains `pos`
pub fn node_at_with_tolerance(graph: &Graph, pos: Pos2, tolerance: f32) -> Option<&NodeId> {
    graph
        .nodes()
        .rev()
        .find(|node| {
            node.position
                .is_some_and(|p| node_rect(p).expand(tolerance).contains(pos))
        })
        .map(|node| &node.id)
}

/// Pointer state machine plus the current selection
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    mode: EditMode,
    state: InteractionState,
    selected: Option<NodeId>,
}

impl InteractionController {
    /// Create an idle controller in move mode
    pub fn new() -> Self {
        Self::default()
    }

    /// Current edit mode
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// Change what the next pointer-down on a node starts.
    /// A gesture already in progress is not affected.
    pub fn set_mode(&mut self, mode: EditMode) {
        self.mode = mode;
    }

    /// Current pointer state
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Selected node, if any
    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    /// Select a node, or clear the selection with `None`
    pub fn select(&mut self, node_id: Option<NodeId>) {
        self.selected = node_id;
    }

    /// Drop every reference to a node that left the graph
    pub fn forget_node(&mut self, node_id: &NodeId) {
        if self.selected.as_ref() == Some(node_id) {
            self.selected = None;
        }
        let involved = match &self.state {
            InteractionState::DraggingNode { node_id: id, .. } => id == node_id,
            InteractionState::DrawingConnection { source_id, .. } => source_id == node_id,
            InteractionState::Idle => false,
        };
        if involved {
            self.state = InteractionState::Idle;
        }
    }

    /// Clear selection and any gesture
    pub fn reset(&mut self) {
        self.state = InteractionState::Idle;
        self.selected = None;
    }

    /// Abandon the current gesture. A drag in progress ends where the node
    /// currently is and is reported as [`InteractionEvent::NodeMoved`].
    pub fn cancel(&mut self) -> Option<InteractionEvent> {
        match std::mem::take(&mut self.state) {
            InteractionState::Idle => None,
            InteractionState::DraggingNode { node_id, .. } => {
                tracing::debug!(node = %node_id, "Drag cancelled");
                Some(InteractionEvent::NodeMoved(node_id))
            }
            InteractionState::DrawingConnection { source_id, .. } => {
                tracing::debug!(node = %source_id, "Connection cancelled");
                None
            }
        }
    }

    /// Handle a pointer press at `pos` (canvas units).
    ///
    /// A gesture still running (its release was lost) is cancelled first;
    /// the returned event is that gesture's outcome.
    pub fn pointer_down(&mut self, graph: &Graph, pos: Pos2) -> Option<InteractionEvent> {
        let abandoned = if self.state.is_idle() {
            None
        } else {
            tracing::debug!(state = ?self.state, "Pointer down while a gesture was active, restarting");
            self.cancel()
        };

        let Some(node) = node_at(graph, pos).and_then(|id| graph.node(id)) else {
            self.selected = None;
            return abandoned;
        };
        self.selected = Some(node.id.clone());

        match self.mode {
            EditMode::Move => {
                let top_left = node.position.map(Pos2::from).unwrap_or_default();
                self.state = InteractionState::DraggingNode {
                    node_id: node.id.clone(),
                    grab_offset: pos - top_left,
                };
                tracing::debug!(node = %node.id, "Started dragging node");
            }
            EditMode::Connect => {
                self.state = InteractionState::DrawingConnection {
                    source_id: node.id.clone(),
                    cursor: pos,
                };
                tracing::debug!(node = %node.id, "Started drawing connection");
            }
        }
        abandoned
    }

    /// Handle pointer motion to `pos` (canvas units)
    pub fn pointer_move(&mut self, graph: &mut Graph, pos: Pos2) {
        match &mut self.state {
            InteractionState::Idle => {}
            InteractionState::DraggingNode { node_id, grab_offset } => {
                let target = pos - *grab_offset;
                if let Err(e) = graph.set_position(node_id, target.x, target.y) {
                    tracing::warn!("Dragged node vanished: {e}");
                    self.state = InteractionState::Idle;
                }
            }
            InteractionState::DrawingConnection { cursor, .. } => {
                *cursor = pos;
            }
        }
    }

    /// Handle a pointer release at `pos` (canvas units)
    pub fn pointer_up(&mut self, graph: &mut Graph, pos: Pos2) -> Option<InteractionEvent> {
        match std::mem::take(&mut self.state) {
            InteractionState::Idle => None,
            InteractionState::DraggingNode { node_id, .. } => {
                tracing::debug!(node = %node_id, "Finished dragging node");
                graph
                    .contains_node(&node_id)
                    .then_some(InteractionEvent::NodeMoved(node_id))
            }
            InteractionState::DrawingConnection { source_id, .. } => {
                self.finish_connection(graph, source_id, pos)
            }
        }
    }

    fn finish_connection(
        &mut self,
        graph: &mut Graph,
        source_id: NodeId,
        pos: Pos2,
    ) -> Option<InteractionEvent> {
        let target_id = node_at_with_tolerance(graph, pos, HIT_TOLERANCE)?.clone();
        if target_id == source_id || graph.has_edge_between(&source_id, &target_id) {
            tracing::debug!(source = %source_id, target = %target_id, "Connection discarded");
            return None;
        }

        let edge = Edge::new(EdgeId::generate(), source_id, target_id).with_label(DEFAULT_EDGE_LABEL);
        let edge_id = edge.id.clone();
        match graph.add_edge(edge) {
            Ok(()) => {
                tracing::debug!(edge = %edge_id, "Connection created");
                Some(InteractionEvent::EdgeCreated(edge_id))
            }
            Err(e) => {
                tracing::warn!("Failed to create connection: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, NodeKind, Position};

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    fn two_nodes() -> Graph {
        let mut graph = Graph::new();
        graph
            .add_node(Node::new("a", NodeKind::Trigger, "A").with_position(100.0, 100.0))
            .unwrap();
        graph
            .add_node(Node::new("b", NodeKind::Action, "B").with_position(500.0, 100.0))
            .unwrap();
        graph
    }

    #[test]
    fn test_drag_keeps_grab_offset() {
        let mut graph = two_nodes();
        let mut controller = InteractionController::new();

        controller.pointer_down(&graph, Pos2::new(120.0, 110.0));
        assert_eq!(
            controller.state(),
            &InteractionState::DraggingNode {
                node_id: id("a"),
                grab_offset: Vec2::new(20.0, 10.0),
            }
        );

        controller.pointer_move(&mut graph, Pos2::new(300.0, 300.0));
        assert_eq!(graph.node(&id("a")).unwrap().position, Some(Position::new(280.0, 290.0)));

        let event = controller.pointer_up(&mut graph, Pos2::new(300.0, 300.0));
        assert_eq!(event, Some(InteractionEvent::NodeMoved(id("a"))));
        assert!(controller.state().is_idle());
        assert_eq!(graph.node(&id("a")).unwrap().position, Some(Position::new(280.0, 290.0)));
    }

    #[test]
    fn test_pointer_down_selects_in_any_mode() {
        let graph = two_nodes();
        let mut controller = InteractionController::new();
        controller.set_mode(EditMode::Connect);
        controller.pointer_down(&graph, Pos2::new(510.0, 150.0));
        assert_eq!(controller.selected(), Some(&id("b")));

        controller.cancel();
        controller.pointer_down(&graph, Pos2::new(0.0, 0.0));
        assert_eq!(controller.selected(), None);
        assert!(controller.state().is_idle());
    }

    #[test]
    fn test_connect_creates_labelled_edge() {
        let mut graph = two_nodes();
        let mut controller = InteractionController::new();
        controller.set_mode(EditMode::Connect);

        controller.pointer_down(&graph, Pos2::new(150.0, 140.0));
        controller.pointer_move(&mut graph, Pos2::new(400.0, 120.0));
        assert!(matches!(
            controller.state(),
            InteractionState::DrawingConnection { cursor, .. } if *cursor == Pos2::new(400.0, 120.0)
        ));

        let event = controller.pointer_up(&mut graph, Pos2::new(520.0, 130.0));
        assert!(matches!(event, Some(InteractionEvent::EdgeCreated(_))));
        let edge = graph.edges().next().unwrap();
        assert_eq!(edge.source_id, id("a"));
        assert_eq!(edge.target_id, id("b"));
        assert_eq!(edge.label.as_deref(), Some("Next"));
    }

    #[test]
    fn test_connect_skips_self_and_duplicates() {
        let mut graph = two_nodes();
        let mut controller = InteractionController::new();
        controller.set_mode(EditMode::Connect);

        controller.pointer_down(&graph, Pos2::new(150.0, 140.0));
        assert_eq!(controller.pointer_up(&mut graph, Pos2::new(160.0, 140.0)), None);
        assert_eq!(graph.edge_count(), 0);

        for _ in 0..2 {
            controller.pointer_down(&graph, Pos2::new(150.0, 140.0));
            controller.pointer_up(&mut graph, Pos2::new(520.0, 130.0));
        }
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_connect_release_on_empty_canvas() {
        let mut graph = two_nodes();
        let mut controller = InteractionController::new();
        controller.set_mode(EditMode::Connect);
        controller.pointer_down(&graph, Pos2::new(150.0, 140.0));
        assert_eq!(controller.pointer_up(&mut graph, Pos2::new(900.0, 900.0)), None);
        assert_eq!(graph.edge_count(), 0);
        assert!(controller.state().is_idle());
    }

    #[test]
    fn test_hit_test_tolerance() {
        let mut graph = Graph::new();
        graph
            .add_node(Node::new("n", NodeKind::Action, "N").with_position(100.0, 10.0))
            .unwrap();

        let hit = node_at_with_tolerance(&graph, Pos2::new(115.0, 45.0), HIT_TOLERANCE);
        assert_eq!(hit, Some(&id("n")));
        assert_eq!(node_at_with_tolerance(&graph, Pos2::new(97.0, 7.0), HIT_TOLERANCE), Some(&id("n")));
        assert_eq!(node_at(&graph, Pos2::new(97.0, 7.0)), None);
        assert_eq!(node_at_with_tolerance(&graph, Pos2::new(90.0, 0.0), HIT_TOLERANCE), None);
        assert_eq!(node_at_with_tolerance(&graph, Pos2::new(335.0, 50.0), HIT_TOLERANCE), None);
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut graph = Graph::new();
        graph
            .add_node(Node::new("under", NodeKind::Action, "U").with_position(0.0, 0.0))
            .unwrap();
        graph
            .add_node(Node::new("over", NodeKind::Action, "O").with_position(50.0, 20.0))
            .unwrap();
        assert_eq!(node_at(&graph, Pos2::new(60.0, 30.0)), Some(&id("over")));
        assert_eq!(node_at(&graph, Pos2::new(10.0, 10.0)), Some(&id("under")));
    }

    #[test]
    fn test_mode_change_does_not_interrupt_drag() {
        let mut graph = two_nodes();
        let mut controller = InteractionController::new();
        controller.pointer_down(&graph, Pos2::new(120.0, 110.0));
        controller.set_mode(EditMode::Connect);
        assert!(matches!(controller.state(), InteractionState::DraggingNode { .. }));
        controller.pointer_move(&mut graph, Pos2::new(130.0, 110.0));
        assert_eq!(graph.node(&id("a")).unwrap().position, Some(Position::new(110.0, 100.0)));
    }

    #[test]
    fn test_abandoned_drag_reports_move() {
        let mut graph = two_nodes();
        let mut controller = InteractionController::new();

        controller.pointer_down(&graph, Pos2::new(120.0, 110.0));
        controller.pointer_move(&mut graph, Pos2::new(200.0, 200.0));
        assert_eq!(controller.cancel(), Some(InteractionEvent::NodeMoved(id("a"))));
        assert_eq!(controller.cancel(), None);

        controller.pointer_down(&graph, Pos2::new(190.0, 200.0));
        let abandoned = controller.pointer_down(&graph, Pos2::new(510.0, 150.0));
        assert_eq!(abandoned, Some(InteractionEvent::NodeMoved(id("a"))));
        assert!(matches!(
            controller.state(),
            InteractionState::DraggingNode { node_id, .. } if *node_id == id("b")
        ));

        controller.set_mode(EditMode::Connect);
        controller.cancel();
        controller.pointer_down(&graph, Pos2::new(510.0, 150.0));
        assert_eq!(controller.cancel(), None);
    }

    #[test]
    fn test_forget_node_resets_gesture() {
        let mut graph = two_nodes();
        let mut controller = InteractionController::new();
        controller.pointer_down(&graph, Pos2::new(120.0, 110.0));
        graph.remove_node(&id("a"));
        controller.forget_node(&id("a"));
        assert!(controller.state().is_idle());
        assert_eq!(controller.selected(), None);
    }
}
