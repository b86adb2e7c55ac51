// SPDX-License-Identifier: MIT OR Apache-2.0
//! Mermaid flowchart export.

use crate::graph::Graph;
use crate::node::NodeKind;
use std::fmt::Write;

/// Mermaid shape brackets for a node kind
fn shape(kind: NodeKind) -> (&'static str, &'static str) {
    match kind {
        NodeKind::Trigger => ("([", "])"),
        NodeKind::Action => ("[/", "\\]"),
        NodeKind::Condition => ("{{", "}}"),
        NodeKind::Loop => ("((", "))"),
        NodeKind::Delay => ("[[", "]]"),
    }
}

/// Fill and stroke colors for a node kind
fn class_style(kind: NodeKind) -> (&'static str, &'static str) {
    match kind {
        NodeKind::Trigger => ("#E6F7FF", "#1890FF"),
        NodeKind::Action => ("#F6FFED", "#52C41A"),
        NodeKind::Condition => ("#FFFBE6", "#FAAD14"),
        NodeKind::Loop => ("#F9F0FF", "#722ED1"),
        NodeKind::Delay => ("#FFF2E8", "#FA541C"),
    }
}

/// Escape text for use inside a quoted Mermaid label
fn escape_label(text: &str) -> String {
    text.replace('"', "#quot;")
}

/// Escape text for use between the pipes of an edge label
fn escape_edge_label(text: &str) -> String {
    escape_label(text).replace('|', "#124;")
}

/// Render the graph as a top-down Mermaid flowchart
pub fn to_mermaid(graph: &Graph) -> String {
    let mut out = String::from("graph TD;\n");

    for node in graph.nodes() {
        let (open, close) = shape(node.kind);
        let _ = writeln!(out, "  {}{open}\"{}\"{close};", node.id, escape_label(&node.label));
    }

    for edge in graph.edges() {
        match &edge.label {
            Some(label) => {
                let _ = writeln!(
                    out,
                    "  {} -->|{}| {};",
                    edge.source_id,
                    escape_edge_label(label),
                    edge.target_id
                );
            }
            None => {
                let _ = writeln!(out, "  {} --> {};", edge.source_id, edge.target_id);
            }
        }
    }

    for kind in NodeKind::all() {
        let (fill, stroke) = class_style(*kind);
        let _ = writeln!(out, "  classDef {kind} fill:{fill},stroke:{stroke},stroke-width:2px;");
    }

    for node in graph.nodes() {
        let _ = writeln!(out, "  class {} {};", node.id, node.kind);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Edge;
    use crate::node::Node;

    #[test]
    fn test_mermaid_output() {
        let mut graph = Graph::new();
        graph.add_node(Node::new("t", NodeKind::Trigger, "New lead")).unwrap();
        graph.add_node(Node::new("c", NodeKind::Condition, "Is \"hot\"?")).unwrap();
        graph.add_node(Node::new("a", NodeKind::Action, "Notify")).unwrap();
        graph.add_edge(Edge::new("e1", "t", "c")).unwrap();
        graph.add_edge(Edge::new("e2", "c", "a").with_label("Positive")).unwrap();

        let text = to_mermaid(&graph);
        assert!(text.starts_with("graph TD;\n"));
        assert!(text.contains("  t([\"New lead\"]);\n"));
        assert!(text.contains("  c{{\"Is #quot;hot#quot;?\"}};\n"));
        assert!(text.contains("  a[/\"Notify\"\\];\n"));
        assert!(text.contains("  t --> c;\n"));
        assert!(text.contains("  c -->|Positive| a;\n"));
        assert!(text.contains("  classDef delay fill:#FFF2E8,stroke:#FA541C,stroke-width:2px;\n"));
        assert!(text.ends_with("  class a action;\n"));
    }

    #[test]
    fn test_edge_label_pipes_escaped() {
        let mut graph = Graph::new();
        graph.add_node(Node::new("c", NodeKind::Condition, "Score")).unwrap();
        graph.add_node(Node::new("a", NodeKind::Action, "Route")).unwrap();
        graph
            .add_edge(Edge::new("e", "c", "a").with_label("a|b \"x\""))
            .unwrap();

        let text = to_mermaid(&graph);
        assert!(text.contains("  c -->|a#124;b #quot;x#quot;| a;\n"));
        assert!(!text.contains("a|b"));
    }
}
