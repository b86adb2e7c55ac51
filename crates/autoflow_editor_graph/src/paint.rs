// SPDX-License-Identifier: MIT OR Apache-2.0
//! egui painter for [`DrawList`]s.
//!
//! Paints what [`project`](crate::render::project) produced and nothing
//! else; all geometry decisions live in the projection.

use crate::node::NodeKind;
use crate::render::{quadratic_points, DrawList, Primitive};
use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Rounding, Shape, Stroke, Vec2};

/// Node visual parameters
const NODE_HEADER_HEIGHT: f32 = 24.0;
const NODE_ROUNDING: f32 = 6.0;
const NODE_SHADOW_OFFSET: f32 = 3.0;

/// Connection visual parameters
const CURVE_SEGMENTS: usize = 16;
const CONNECTION_THICKNESS: f32 = 2.0;
const ARROW_LENGTH: f32 = 10.0;
const ARROW_HALF_WIDTH: f32 = 3.5;
const DASH_LENGTH: f32 = 5.0;

/// Colors used by the painter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStyle {
    /// Node body fill
    pub body: Color32,
    /// Node body fill when selected
    pub body_selected: Color32,
    /// Selection outline
    pub outline_selected: Color32,
    /// Title text
    pub text: Color32,
    /// Secondary text
    pub subtext: Color32,
    /// Edge stroke
    pub edge: Color32,
    /// Preview stroke
    pub preview: Color32,
    /// Delete handle fill
    pub handle: Color32,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            body: Color32::from_rgb(45, 45, 48),
            body_selected: Color32::from_rgb(60, 70, 90),
            outline_selected: Color32::from_rgb(100, 150, 255),
            text: Color32::WHITE,
            subtext: Color32::from_gray(180),
            edge: Color32::from_rgba_unmultiplied(107, 114, 128, 200),
            preview: Color32::from_rgba_unmultiplied(59, 130, 246, 160),
            handle: Color32::WHITE,
        }
    }
}

fn kind_color(kind: NodeKind) -> Color32 {
    let [r, g, b] = kind.color();
    Color32::from_rgb(r, g, b)
}

/// Paint a draw list with its origin at `origin` (screen space).
/// Returns the number of primitives painted.
pub fn paint_draw_list(painter: &Painter, origin: Vec2, list: &DrawList, style: &NodeStyle) -> usize {
    let zoom = list.zoom.max(f32::EPSILON);
    let edge_stroke = Stroke::new(CONNECTION_THICKNESS * zoom, style.edge);

    for primitive in list.iter() {
        match primitive {
            Primitive::NodeBox {
                kind,
                label,
                service,
                rect,
                selected,
                ..
            } => paint_node(
                painter,
                rect.translate(origin),
                *kind,
                label,
                service.as_deref(),
                *selected,
                zoom,
                style,
            ),

            Primitive::EdgeCurve { start, segments, .. } => {
                let mut points = quadratic_points(
                    *start + origin,
                    segments[0].control + origin,
                    segments[0].end + origin,
                    CURVE_SEGMENTS,
                );
                points.pop();
                points.extend(quadratic_points(
                    segments[0].end + origin,
                    segments[1].control + origin,
                    segments[1].end + origin,
                    CURVE_SEGMENTS,
                ));
                for pair in points.windows(2) {
                    painter.line_segment([pair[0], pair[1]], edge_stroke);
                }
            }

            Primitive::Arrowhead { tip, angle, .. } => {
                let tip = *tip + origin;
                let dir = Vec2::angled(*angle);
                let normal = dir.rot90();
                let base = tip - dir * ARROW_LENGTH * zoom;
                let points = vec![
                    tip,
                    base + normal * ARROW_HALF_WIDTH * zoom,
                    base - normal * ARROW_HALF_WIDTH * zoom,
                ];
                painter.add(Shape::convex_polygon(points, style.edge, Stroke::NONE));
            }

            Primitive::DeleteHandle { center, radius, .. } => {
                painter.circle_filled(*center + origin, *radius, style.handle);
                painter.circle_stroke(*center + origin, *radius, Stroke::new(1.0, style.edge));
            }

            Primitive::EdgeLabel { anchor, text, .. } => {
                painter.text(
                    *anchor + origin,
                    Align2::CENTER_CENTER,
                    text,
                    FontId::proportional(10.0 * zoom),
                    style.subtext,
                );
            }

            Primitive::ConnectionPreview { from, to } => {
                painter.extend(Shape::dashed_line(
                    &[*from + origin, *to + origin],
                    Stroke::new(CONNECTION_THICKNESS * zoom, style.preview),
                    DASH_LENGTH * zoom,
                    DASH_LENGTH * zoom,
                ));
            }
        }
    }

    list.len()
}

fn paint_node(
    painter: &Painter,
    screen_rect: Rect,
    kind: NodeKind,
    label: &str,
    service: Option<&str>,
    selected: bool,
    zoom: f32,
    style: &NodeStyle,
) {
    let rounding = NODE_ROUNDING * zoom;

    // Draw shadow
    let shadow_rect = screen_rect.translate(Vec2::splat(NODE_SHADOW_OFFSET));
    painter.rect_filled(shadow_rect, rounding, Color32::from_rgba_unmultiplied(0, 0, 0, 60));

    let body = if selected { style.body_selected } else { style.body };
    painter.rect_filled(screen_rect, rounding, body);

    let header_rect = Rect::from_min_size(
        screen_rect.min,
        Vec2::new(screen_rect.width(), NODE_HEADER_HEIGHT * zoom),
    );
    painter.rect_filled(
        header_rect,
        Rounding {
            nw: rounding,
            ne: rounding,
            sw: 0.0,
            se: 0.0,
        },
        kind_color(kind),
    );
    painter.text(
        header_rect.center(),
        Align2::CENTER_CENTER,
        label,
        FontId::proportional(12.0 * zoom),
        style.text,
    );

    let body_center = Pos2::new(
        screen_rect.center().x,
        (header_rect.bottom() + screen_rect.bottom()) / 2.0,
    );
    let subtitle = match service {
        Some(service) if !service.is_empty() => service,
        _ => kind.display_name(),
    };
    painter.text(
        body_center,
        Align2::CENTER_CENTER,
        subtitle,
        FontId::proportional(10.0 * zoom),
        style.subtext,
    );

    if selected {
        painter.rect_stroke(screen_rect, rounding, Stroke::new(2.0, style.outline_selected));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Edge;
    use crate::graph::Graph;
    use crate::interaction::InteractionController;
    use crate::node::Node;
    use crate::render::project;
    use crate::viewport::Viewport;

    #[test]
    fn test_paint_emits_shapes() {
        let mut graph = Graph::new();
        graph
            .add_node(Node::new("a", NodeKind::Trigger, "A").with_position(0.0, 0.0))
            .unwrap();
        graph
            .add_node(Node::new("b", NodeKind::Delay, "B").with_position(300.0, 0.0))
            .unwrap();
        graph.add_edge(Edge::new("e", "a", "b").with_label("Next")).unwrap();
        let list = project(&graph, &Viewport::new(), &InteractionController::new());

        let ctx = egui::Context::default();
        let mut painted = 0;
        let output = ctx.run(egui::RawInput::default(), |ctx| {
            let painter = ctx.layer_painter(egui::LayerId::background());
            painted = paint_draw_list(&painter, Vec2::new(10.0, 10.0), &list, &NodeStyle::default());
        });

        assert_eq!(painted, list.len());
        assert!(output.shapes.len() > list.len());
    }
}
