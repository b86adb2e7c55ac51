// SPDX-License-Identifier: MIT OR Apache-2.0
//! Initial grid placement for nodes that have no position yet.

use crate::graph::Graph;
use crate::node::Position;

/// Left edge of the first grid column
pub const GRID_ORIGIN_X: f32 = 150.0;
/// Top edge of the first grid row
pub const GRID_ORIGIN_Y: f32 = 100.0;
/// Horizontal distance between columns
pub const GRID_SPACING_X: f32 = 200.0;
/// Vertical distance between rows
pub const GRID_SPACING_Y: f32 = 150.0;

/// Number of grid columns for `node_count` nodes
pub fn grid_columns(node_count: usize) -> usize {
    let mut cols = (node_count as f64).sqrt().ceil() as usize;
    // Guard against float rounding on perfect squares
    while cols * cols < node_count {
        cols += 1;
    }
    cols.max(1)
}

/// Grid cell for the node at `index` in a graph of `node_count` nodes
pub fn grid_position(index: usize, node_count: usize) -> Position {
    let cols = grid_columns(node_count);
    let col = index % cols;
    let row = index / cols;
    Position::new(
        GRID_ORIGIN_X + col as f32 * GRID_SPACING_X,
        GRID_ORIGIN_Y + row as f32 * GRID_SPACING_Y,
    )
}

/// Assign a grid cell to every node without a position.
///
/// Positioned nodes are left alone, so repeated calls are stable. Returns
/// the number of nodes that were placed.
pub fn apply_grid_layout(graph: &mut Graph) -> usize {
    let count = graph.node_count();
    let mut placed = 0;
    for (index, node) in graph.nodes_mut().enumerate() {
        if node.position.is_none() {
            node.position = Some(grid_position(index, count));
            placed += 1;
        }
    }
    if placed > 0 {
        tracing::debug!(placed, total = count, "Applied grid layout");
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, NodeId, NodeKind};

    fn graph_with(n: usize) -> Graph {
        let mut graph = Graph::new();
        for i in 0..n {
            graph
                .add_node(Node::new(format!("n{i}"), NodeKind::Action, format!("Step {i}")))
                .unwrap();
        }
        graph
    }

    fn position_of(graph: &Graph, id: &str) -> Position {
        graph.node(&NodeId::from(id)).unwrap().position.unwrap()
    }

    #[test]
    fn test_grid_columns() {
        assert_eq!(grid_columns(0), 1);
        assert_eq!(grid_columns(1), 1);
        assert_eq!(grid_columns(4), 2);
        assert_eq!(grid_columns(5), 3);
        assert_eq!(grid_columns(9), 3);
        assert_eq!(grid_columns(10), 4);
    }

    #[test]
    fn test_five_node_grid() {
        let mut graph = graph_with(5);
        assert_eq!(apply_grid_layout(&mut graph), 5);
        assert_eq!(position_of(&graph, "n0"), Position::new(150.0, 100.0));
        assert_eq!(position_of(&graph, "n2"), Position::new(550.0, 100.0));
        assert_eq!(position_of(&graph, "n3"), Position::new(150.0, 250.0));
        assert_eq!(position_of(&graph, "n4"), Position::new(350.0, 250.0));
    }

    #[test]
    fn test_layout_is_idempotent() {
        let mut graph = graph_with(7);
        apply_grid_layout(&mut graph);
        let first = graph.clone();
        assert_eq!(apply_grid_layout(&mut graph), 0);
        assert_eq!(graph, first);
    }

    #[test]
    fn test_explicit_positions_untouched() {
        let mut graph = graph_with(3);
        graph.set_position(&NodeId::from("n1"), -40.0, 12.5).unwrap();
        assert_eq!(apply_grid_layout(&mut graph), 2);
        assert_eq!(position_of(&graph, "n1"), Position::new(-40.0, 12.5));
        assert_eq!(position_of(&graph, "n2"), Position::new(150.0, 250.0));
    }

    #[test]
    fn test_new_node_slots_by_its_index() {
        let mut graph = graph_with(4);
        apply_grid_layout(&mut graph);
        graph.add_node(Node::new("late", NodeKind::Delay, "Late")).unwrap();
        apply_grid_layout(&mut graph);
        // five nodes now, three columns, index 4 -> row 1 col 1
        assert_eq!(position_of(&graph, "late"), Position::new(350.0, 250.0));
    }
}
