// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes and connections.
//!
//! [`Graph`] is the only owner of node and edge storage and enforces the
//! structural invariants on every mutation:
//! - node ids are unique
//! - edge ids are unique
//! - every edge endpoint is a node in the graph
//! - at most one edge per ordered `(source, target)` pair
//!
//! Reverse edges are distinct pairs and are allowed.

use crate::connection::{Edge, EdgeId};
use crate::error::{GraphError, Result};
use crate::node::{Node, NodeId, NodeUpdate, Position};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Serialized form of a graph, as exchanged with the generation and
/// persistence services
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    /// Nodes in z-order
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Connections between nodes
    #[serde(default)]
    pub connections: Vec<Edge>,
}

/// A workflow graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WorkflowDefinition", into = "WorkflowDefinition")]
pub struct Graph {
    /// Nodes in insertion (z-) order
    nodes: IndexMap<NodeId, Node>,
    /// Connections between nodes
    edges: IndexMap<EdgeId, Edge>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a definition, checking every invariant
    pub fn from_definition(definition: WorkflowDefinition) -> Result<Self> {
        let mut graph = Self::new();
        for node in definition.nodes {
            graph.add_node(node)?;
        }
        for edge in definition.connections {
            graph.add_edge(edge)?;
        }
        Ok(graph)
    }

    /// Snapshot the graph as a definition
    pub fn to_definition(&self) -> WorkflowDefinition {
        WorkflowDefinition {
            nodes: self.nodes.values().cloned().collect(),
            connections: self.edges.values().cloned().collect(),
        }
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, node: Node) -> Result<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(GraphError::DuplicateNodeId(node.id));
        }
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    /// Remove a node and every edge touching it
    pub fn remove_node(&mut self, node_id: &NodeId) -> Option<Node> {
        let node = self.nodes.shift_remove(node_id)?;
        self.edges.retain(|_, e| !e.involves_node(node_id));
        Some(node)
    }

    /// Merge `update` into an existing node
    pub fn update_node(&mut self, node_id: &NodeId, update: NodeUpdate) -> Result<()> {
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.clone()))?;
        node.apply(update);
        Ok(())
    }

    /// Overwrite a node's position
    pub fn set_position(&mut self, node_id: &NodeId, x: f32, y: f32) -> Result<()> {
        let node = self
            .nodes
            .get_mut(node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.clone()))?;
        node.position = Some(Position::new(x, y));
        Ok(())
    }

    /// Get a node by ID
    pub fn node(&self, node_id: &NodeId) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    /// Check whether a node exists
    pub fn contains_node(&self, node_id: &NodeId) -> bool {
        self.nodes.contains_key(node_id)
    }

    /// Get all nodes, in z-order
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = &Node> {
        self.nodes.values()
    }

    /// Mutable access for in-crate passes that never touch ids
    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Add an edge between two existing nodes
    pub fn add_edge(&mut self, edge: Edge) -> Result<()> {
        if !self.nodes.contains_key(&edge.source_id) {
            return Err(GraphError::NodeNotFound(edge.source_id));
        }
        if !self.nodes.contains_key(&edge.target_id) {
            return Err(GraphError::NodeNotFound(edge.target_id));
        }
        if self.has_edge_between(&edge.source_id, &edge.target_id) {
            return Err(GraphError::DuplicateEdge {
                from: edge.source_id,
                to: edge.target_id,
            });
        }
        if self.edges.contains_key(&edge.id) {
            return Err(GraphError::DuplicateEdgeId(edge.id));
        }
        self.edges.insert(edge.id.clone(), edge);
        Ok(())
    }

    /// Remove an edge
    pub fn remove_edge(&mut self, edge_id: &EdgeId) -> Option<Edge> {
        self.edges.shift_remove(edge_id)
    }

    /// Get an edge by ID
    pub fn edge(&self, edge_id: &EdgeId) -> Option<&Edge> {
        self.edges.get(edge_id)
    }

    /// Get all edges
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Get edges touching a node
    pub fn edges_for_node<'a>(&'a self, node_id: &'a NodeId) -> impl Iterator<Item = &'a Edge> {
        self.edges.values().filter(move |e| e.involves_node(node_id))
    }

    /// Check for an edge from `source` to `target`
    pub fn has_edge_between(&self, source: &NodeId, target: &NodeId) -> bool {
        self.edges.values().any(|e| e.connects(source, target))
    }

    /// Get the number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Check whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl TryFrom<WorkflowDefinition> for Graph {
    type Error = GraphError;

    fn try_from(definition: WorkflowDefinition) -> Result<Self> {
        Self::from_definition(definition)
    }
}

impl From<Graph> for WorkflowDefinition {
    fn from(graph: Graph) -> Self {
        WorkflowDefinition {
            nodes: graph.nodes.into_values().collect(),
            connections: graph.edges.into_values().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use serde_json::json;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    fn three_nodes() -> Graph {
        let mut graph = Graph::new();
        graph.add_node(Node::new("a", NodeKind::Trigger, "A")).unwrap();
        graph.add_node(Node::new("b", NodeKind::Action, "B")).unwrap();
        graph.add_node(Node::new("c", NodeKind::Condition, "C")).unwrap();
        graph
    }

    #[test]
    fn test_duplicate_node_id_rejected() {
        let mut graph = three_nodes();
        let err = graph.add_node(Node::new("a", NodeKind::Loop, "again")).unwrap_err();
        assert_eq!(err, GraphError::DuplicateNodeId(id("a")));
        assert_eq!(graph.node(&id("a")).unwrap().label, "A");
    }

    #[test]
    fn test_remove_node_cascades() {
        let mut graph = three_nodes();
        graph.add_edge(Edge::new("e1", "a", "b")).unwrap();
        graph.add_edge(Edge::new("e2", "b", "c")).unwrap();
        graph.add_edge(Edge::new("e3", "a", "c")).unwrap();

        let removed = graph.remove_node(&id("b")).unwrap();
        assert_eq!(removed.id, id("b"));
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.edge(&EdgeId::from("e3")).is_some());

        graph.add_node(Node::new("b", NodeKind::Action, "B")).unwrap();
        assert_eq!(graph.edges_for_node(&id("b")).count(), 0);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut graph = three_nodes();
        assert!(graph.remove_node(&id("zzz")).is_none());
        assert!(graph.remove_edge(&EdgeId::from("zzz")).is_none());
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn test_remove_node_keeps_order() {
        let mut graph = three_nodes();
        graph.remove_node(&id("a"));
        let ids: Vec<_> = graph.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_duplicate_edge_rejected() {
        let mut graph = three_nodes();
        graph.add_edge(Edge::new("e1", "a", "b")).unwrap();
        let err = graph.add_edge(Edge::new("e2", "a", "b")).unwrap_err();
        assert_eq!(err, GraphError::DuplicateEdge { from: id("a"), to: id("b") });
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.edge(&EdgeId::from("e2")).is_none());
    }

    #[test]
    fn test_reverse_edge_allowed() {
        let mut graph = three_nodes();
        graph.add_edge(Edge::new("e1", "a", "b")).unwrap();
        graph.add_edge(Edge::new("e2", "b", "a")).unwrap();
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_edge_endpoint_must_exist() {
        let mut graph = three_nodes();
        let err = graph.add_edge(Edge::new("e1", "a", "ghost")).unwrap_err();
        assert_eq!(err, GraphError::NodeNotFound(id("ghost")));
        assert!(err.is_not_found());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_duplicate_edge_id_rejected() {
        let mut graph = three_nodes();
        graph.add_edge(Edge::new("e1", "a", "b")).unwrap();
        let err = graph.add_edge(Edge::new("e1", "b", "c")).unwrap_err();
        assert!(err.is_duplicate_id());
    }

    #[test]
    fn test_update_and_position_require_node() {
        let mut graph = three_nodes();
        assert_eq!(
            graph.update_node(&id("x"), NodeUpdate::label("x")),
            Err(GraphError::NodeNotFound(id("x")))
        );
        assert!(graph.set_position(&id("x"), 1.0, 2.0).is_err());

        graph.update_node(&id("a"), NodeUpdate::label("Start")).unwrap();
        graph.set_position(&id("a"), 5.0, 6.0).unwrap();
        let node = graph.node(&id("a")).unwrap();
        assert_eq!(node.label, "Start");
        assert_eq!(node.position, Some(Position::new(5.0, 6.0)));
    }

    #[test]
    fn test_deserialize_validates_structure() {
        let ok = json!({
            "nodes": [
                { "id": "a", "type": "trigger", "name": "A" },
                { "id": "b", "type": "action", "name": "B" }
            ],
            "connections": [ { "id": "c1", "sourceId": "a", "targetId": "b" } ]
        });
        let graph: Graph = serde_json::from_value(ok).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);

        let dangling = json!({
            "nodes": [ { "id": "a", "type": "trigger", "name": "A" } ],
            "connections": [ { "id": "c1", "sourceId": "a", "targetId": "b" } ]
        });
        assert!(serde_json::from_value::<Graph>(dangling).is_err());
    }

    #[test]
    fn test_serialize_shape() {
        let mut graph = three_nodes();
        graph.add_edge(Edge::new("e1", "a", "b")).unwrap();
        let value = serde_json::to_value(&graph).unwrap();
        assert_eq!(value["nodes"].as_array().unwrap().len(), 3);
        assert_eq!(value["connections"][0]["sourceId"], json!("a"));

        let back: Graph = serde_json::from_value(value).unwrap();
        assert_eq!(back, graph);
    }
}
