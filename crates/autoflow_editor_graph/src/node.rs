// SPDX-License-Identifier: MIT OR Apache-2.0
//! Workflow node definitions.

use egui::Pos2;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Kind-specific node parameters, kept in insertion order
pub type ConfigMap = IndexMap<String, serde_json::Value>;

/// Opaque unique identifier for a node
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    /// Create a node ID from any string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh `node-<uuid>` ID
    pub fn generate() -> Self {
        Self(format!("node-{}", Uuid::new_v4().simple()))
    }

    /// Borrow the raw ID
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Workflow step kind. Fixed when the node is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Starts the workflow (webhook, schedule, ...)
    Trigger,
    /// Performs an operation against a service
    Action,
    /// Branches on a predicate
    Condition,
    /// Iterates over items
    Loop,
    /// Waits before continuing
    Delay,
}

impl NodeKind {
    /// Lowercase identifier used in the interchange format
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Trigger => "trigger",
            NodeKind::Action => "action",
            NodeKind::Condition => "condition",
            NodeKind::Loop => "loop",
            NodeKind::Delay => "delay",
        }
    }

    /// Get the display name for this kind
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeKind::Trigger => "Trigger",
            NodeKind::Action => "Action",
            NodeKind::Condition => "Condition",
            NodeKind::Loop => "Loop",
            NodeKind::Delay => "Delay",
        }
    }

    /// Accent color used by the presentation layer
    pub fn color(&self) -> [u8; 3] {
        match self {
            NodeKind::Trigger => [59, 130, 246],
            NodeKind::Action => [168, 85, 247],
            NodeKind::Condition => [234, 179, 8],
            NodeKind::Loop => [99, 102, 241],
            NodeKind::Delay => [249, 115, 22],
        }
    }

    /// All node kinds, in toolbar order
    pub fn all() -> &'static [NodeKind] {
        &[
            NodeKind::Trigger,
            NodeKind::Action,
            NodeKind::Condition,
            NodeKind::Loop,
            NodeKind::Delay,
        ]
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-left corner of a node, in canvas units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate
    pub y: f32,
}

impl Position {
    /// Create a position
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<Position> for Pos2 {
    fn from(p: Position) -> Self {
        Pos2::new(p.x, p.y)
    }
}

impl From<Pos2> for Position {
    fn from(p: Pos2) -> Self {
        Self::new(p.x, p.y)
    }
}

/// A single workflow step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique node ID
    pub id: NodeId,
    /// Node kind
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Display name
    #[serde(rename = "name")]
    pub label: String,
    /// Longer description shown in the details panel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// External service this step talks to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Icon name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Kind-specific parameters
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub config: ConfigMap,
    /// Canvas position, unset until laid out or dragged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Node {
    /// Create a node with no metadata and no position
    pub fn new(id: impl Into<NodeId>, kind: NodeKind, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            description: None,
            service: None,
            icon: None,
            config: ConfigMap::new(),
            position: None,
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Some(Position::new(x, y));
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the service tag
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Add a config entry
    pub fn with_config(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.config.insert(key.into(), value);
        self
    }

    /// Apply a partial update. `id` and `kind` are never touched.
    pub fn apply(&mut self, update: NodeUpdate) {
        if let Some(label) = update.label {
            self.label = label;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(service) = update.service {
            self.service = Some(service);
        }
        if let Some(icon) = update.icon {
            self.icon = Some(icon);
        }
        self.config.extend(update.config);
        if let Some(position) = update.position {
            self.position = Some(position);
        }
    }
}

/// Partial node fields for [`Graph::update_node`](crate::Graph::update_node)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeUpdate {
    /// New display name
    #[serde(rename = "name")]
    pub label: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New service tag
    pub service: Option<String>,
    /// New icon
    pub icon: Option<String>,
    /// Config entries merged over the existing ones
    pub config: ConfigMap,
    /// New position
    pub position: Option<Position>,
}

impl NodeUpdate {
    /// Update only the label
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    /// Check whether the update carries no fields
    pub fn is_empty(&self) -> bool {
        self.label.is_none()
            && self.description.is_none()
            && self.service.is_none()
            && self.icon.is_none()
            && self.config.is_empty()
            && self.position.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_json_shape() {
        let node = Node::new("n1", NodeKind::Trigger, "Every hour")
            .with_config("interval", json!("1h"))
            .with_position(10.0, 20.0);
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "n1",
                "type": "trigger",
                "name": "Every hour",
                "config": { "interval": "1h" },
                "position": { "x": 10.0, "y": 20.0 }
            })
        );
    }

    #[test]
    fn test_node_optional_fields_default() {
        let node: Node =
            serde_json::from_value(json!({ "id": "a", "type": "delay", "name": "Wait" })).unwrap();
        assert_eq!(node.kind, NodeKind::Delay);
        assert!(node.position.is_none());
        assert!(node.config.is_empty());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let result: Result<Node, _> =
            serde_json::from_value(json!({ "id": "a", "type": "webhook", "name": "x" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_update_merges_config() {
        let mut node = Node::new("a", NodeKind::Action, "Send")
            .with_config("to", json!("ops"))
            .with_config("retries", json!(1));
        let mut update = NodeUpdate::label("Send mail");
        update.config.insert("retries".into(), json!(3));
        node.apply(update);

        assert_eq!(node.label, "Send mail");
        assert_eq!(node.kind, NodeKind::Action);
        assert_eq!(node.config["to"], json!("ops"));
        assert_eq!(node.config["retries"], json!(3));
        let keys: Vec<_> = node.config.keys().cloned().collect();
        assert_eq!(keys, vec!["to", "retries"]);
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = NodeId::generate();
        let b = NodeId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("node-"));
    }
}
