// SPDX-License-Identifier: MIT OR Apache-2.0
//! Errors raised by direct graph model misuse.

use crate::connection::EdgeId;
use crate::node::NodeId;

/// Result type for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Error when mutating a workflow graph
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Referenced node is not in the graph
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Referenced edge is not in the graph
    #[error("Edge not found: {0}")]
    EdgeNotFound(EdgeId),

    /// A node with this id already exists
    #[error("Duplicate node id: {0}")]
    DuplicateNodeId(NodeId),

    /// An edge with this id already exists
    #[error("Duplicate edge id: {0}")]
    DuplicateEdgeId(EdgeId),

    /// An edge with the same ordered endpoints already exists
    #[error("Edge already exists: {from} -> {to}")]
    DuplicateEdge {
        /// Source node of the rejected edge
        from: NodeId,
        /// Target node of the rejected edge
        to: NodeId,
    },
}

impl GraphError {
    /// Whether this error reports a missing node or edge
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NodeNotFound(_) | Self::EdgeNotFound(_))
    }

    /// Whether this error reports an id collision on insert
    pub fn is_duplicate_id(&self) -> bool {
        matches!(self, Self::DuplicateNodeId(_) | Self::DuplicateEdgeId(_))
    }
}
