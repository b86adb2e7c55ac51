// SPDX-License-Identifier: MIT OR Apache-2.0
//! Projection of the graph into drawable primitives.
//!
//! [`project`] is pure: it reads the graph, viewport and interaction state
//! and returns a [`DrawList`] in screen units. Primitives are ordered back
//! to front: edges, the connection preview, then node boxes.

use crate::connection::EdgeId;
use crate::graph::Graph;
use crate::interaction::{InteractionController, InteractionState};
use crate::node::{NodeId, NodeKind};
use crate::viewport::{node_center, node_rect, Viewport};
use egui::{Pos2, Rect, Vec2};
use serde::Serialize;

/// Radius of the delete handle at an edge midpoint, canvas units
pub const HANDLE_RADIUS: f32 = 6.0;
/// Distance an edge label sits above the midpoint, canvas units
pub const LABEL_OFFSET: f32 = 10.0;

/// One quadratic bezier piece of an edge curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuadSegment {
    /// Control point
    pub control: Pos2,
    /// End point
    pub end: Pos2,
}

/// A single drawable element
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "primitive", rename_all = "snake_case")]
pub enum Primitive {
    /// Node body
    NodeBox {
        /// Node drawn
        node_id: NodeId,
        /// Kind, for header color and icon
        kind: NodeKind,
        /// Title text
        label: String,
        /// Service subtitle
        service: Option<String>,
        /// Screen rectangle
        rect: Rect,
        /// Whether the node is selected
        selected: bool,
    },
    /// Edge body: a quadratic to the midpoint, then its smooth continuation
    EdgeCurve {
        /// Edge drawn
        edge_id: EdgeId,
        /// Source node center
        start: Pos2,
        /// Curve pieces, start to end
        segments: [QuadSegment; 2],
    },
    /// Arrowhead at the target end of an edge
    Arrowhead {
        /// Edge the arrow belongs to
        edge_id: EdgeId,
        /// Arrow tip
        tip: Pos2,
        /// Direction of travel, radians
        angle: f32,
    },
    /// Clickable handle that deletes an edge
    DeleteHandle {
        /// Edge removed by the handle
        edge_id: EdgeId,
        /// Handle center
        center: Pos2,
        /// Handle radius
        radius: f32,
    },
    /// Edge label text
    EdgeLabel {
        /// Edge labelled
        edge_id: EdgeId,
        /// Text center
        anchor: Pos2,
        /// Text
        text: String,
    },
    /// Dashed line for a connection being drawn
    ConnectionPreview {
        /// Source node center
        from: Pos2,
        /// Pointer position
        to: Pos2,
    },
}

/// Ordered list of primitives for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DrawList {
    /// Zoom factor the list was projected at
    pub zoom: f32,
    /// Primitives, back to front
    pub primitives: Vec<Primitive>,
}

impl DrawList {
    /// Iterate over primitives
    pub fn iter(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter()
    }

    /// Number of primitives
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Check whether there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Find the edge whose delete handle contains `screen_pos`
    pub fn handle_at(&self, screen_pos: Pos2) -> Option<&EdgeId> {
        self.primitives.iter().rev().find_map(|p| match p {
            Primitive::DeleteHandle {
                edge_id,
                center,
                radius,
            } if center.distance(screen_pos) <= *radius => Some(edge_id),
            _ => None,
        })
    }
}

/// Project the graph into screen-space primitives.
///
/// Nodes without a position are drawn at the canvas origin; edges with an
/// unpositioned endpoint are skipped.
pub fn project(graph: &Graph, viewport: &Viewport, interaction: &InteractionController) -> DrawList {
    let zoom = viewport.zoom();
    let mut primitives = Vec::with_capacity(graph.node_count() + graph.edge_count() * 4 + 1);

    for edge in graph.edges() {
        let source = graph.node(&edge.source_id).and_then(|n| n.position);
        let target = graph.node(&edge.target_id).and_then(|n| n.position);
        let (Some(source), Some(target)) = (source, target) else {
            continue;
        };

        let curve = EdgeGeometry::between(node_center(source), node_center(target));
        let scaled = |p: Pos2| viewport.canvas_to_screen(p);

        primitives.push(Primitive::EdgeCurve {
            edge_id: edge.id.clone(),
            start: scaled(curve.start),
            segments: curve.segments.map(|s| QuadSegment {
                control: scaled(s.control),
                end: scaled(s.end),
            }),
        });
        primitives.push(Primitive::Arrowhead {
            edge_id: edge.id.clone(),
            tip: scaled(curve.end()),
            angle: curve.end_angle(),
        });
        primitives.push(Primitive::DeleteHandle {
            edge_id: edge.id.clone(),
            center: scaled(curve.midpoint()),
            radius: HANDLE_RADIUS * zoom,
        });
        if let Some(label) = &edge.label {
            primitives.push(Primitive::EdgeLabel {
                edge_id: edge.id.clone(),
                anchor: scaled(curve.midpoint() - Vec2::new(0.0, LABEL_OFFSET)),
                text: label.clone(),
            });
        }
    }

    if let InteractionState::DrawingConnection { source_id, cursor } = interaction.state() {
        if let Some(source) = graph.node(source_id).and_then(|n| n.position) {
            primitives.push(Primitive::ConnectionPreview {
                from: viewport.canvas_to_screen(node_center(source)),
                to: viewport.canvas_to_screen(*cursor),
            });
        }
    }

    let selected = interaction.selected();
    for node in graph.nodes() {
        let position = node.position.unwrap_or_default();
        primitives.push(Primitive::NodeBox {
            node_id: node.id.clone(),
            kind: node.kind,
            label: node.label.clone(),
            service: node.service.clone(),
            rect: viewport.canvas_rect_to_screen(node_rect(position)),
            selected: selected == Some(&node.id),
        });
    }

    DrawList { zoom, primitives }
}

/// Canvas-space shape of an edge between two node centers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeGeometry {
    /// Source center
    pub start: Pos2,
    /// The two quadratic pieces
    pub segments: [QuadSegment; 2],
}

impl EdgeGeometry {
    /// Build the curve from `start` to `end`.
    ///
    /// The first piece bends horizontally out of the source into the
    /// midpoint; the second mirrors its control point, arriving
    /// horizontally at the target.
    pub fn between(start: Pos2, end: Pos2) -> Self {
        let mid = start.lerp(end, 0.5);
        Self {
            start,
            segments: [
                QuadSegment {
                    control: Pos2::new(mid.x, start.y),
                    end: mid,
                },
                QuadSegment {
                    control: Pos2::new(mid.x, end.y),
                    end,
                },
            ],
        }
    }

    /// Curve end (target center)
    pub fn end(&self) -> Pos2 {
        self.segments[1].end
    }

    /// Curve midpoint
    pub fn midpoint(&self) -> Pos2 {
        self.segments[0].end
    }

    /// Tangent angle at the target, radians
    pub fn end_angle(&self) -> f32 {
        let last = self.segments[1];
        let mut tangent = last.end - last.control;
        if tangent.length_sq() < f32::EPSILON {
            tangent = self.end() - self.start;
        }
        if tangent.length_sq() < f32::EPSILON {
            return 0.0;
        }
        tangent.angle()
    }

    /// Sample the curve into a polyline with `segments_per_piece` steps per piece
    pub fn points(&self, segments_per_piece: usize) -> Vec<Pos2> {
        let mut points = quadratic_points(
            self.start,
            self.segments[0].control,
            self.segments[0].end,
            segments_per_piece,
        );
        points.pop();
        points.extend(quadratic_points(
            self.segments[0].end,
            self.segments[1].control,
            self.segments[1].end,
            segments_per_piece,
        ));
        points
    }
}

/// Generate points along a quadratic bezier curve
pub fn quadratic_points(p0: Pos2, p1: Pos2, p2: Pos2, segments: usize) -> Vec<Pos2> {
    let segments = segments.max(1);
    let mut points = Vec::with_capacity(segments + 1);

    for i in 0..=segments {
        let t = i as f32 / segments as f32;
        let mt = 1.0 - t;
        let x = mt * mt * p0.x + 2.0 * mt * t * p1.x + t * t * p2.x;
        let y = mt * mt * p0.y + 2.0 * mt * t * p1.y + t * t * p2.y;
        points.push(Pos2::new(x, y));
    }

    points
}
