// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) definitions for the graph.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Label given to connections drawn in the editor
pub const DEFAULT_EDGE_LABEL: &str = "Next";

/// Opaque unique identifier for an edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub String);

impl EdgeId {
    /// Create an edge ID from any string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh `conn-<uuid>` ID
    pub fn generate() -> Self {
        Self(format!("conn-{}", Uuid::new_v4().simple()))
    }

    /// Borrow the raw ID
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for EdgeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A directed link between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    /// Unique edge ID
    pub id: EdgeId,
    /// Node the edge leaves
    pub source_id: NodeId,
    /// Node the edge enters
    pub target_id: NodeId,
    /// Branch label, e.g. "Positive"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Free-text branch condition from the generation service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl Edge {
    /// Create an unlabelled edge
    pub fn new(id: impl Into<EdgeId>, source_id: impl Into<NodeId>, target_id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            label: None,
            condition: None,
        }
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Check if this edge touches a specific node
    pub fn involves_node(&self, node_id: &NodeId) -> bool {
        self.source_id == *node_id || self.target_id == *node_id
    }

    /// Check if this edge runs from `source` to `target`, in that order
    pub fn connects(&self, source: &NodeId, target: &NodeId) -> bool {
        self.source_id == *source && self.target_id == *target
    }
}
