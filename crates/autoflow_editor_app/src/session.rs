// SPDX-License-Identifier: MIT OR Apache-2.0
//! Recorded editing sessions.
//!
//! A session file is a JSON array of commands, each tagged by `command`:
//!
//! ```json
//! [
//!   { "command": "set_mode", "mode": "connect" },
//!   { "command": "pointer_down", "x": 200.0, "y": 130.0 },
//!   { "command": "pointer_up", "x": 400.0, "y": 130.0 }
//! ]
//! ```
//!
//! Pointer coordinates are screen units, as a UI would deliver them.

use crate::error::{AppError, Result};
use autoflow_editor_graph::{EdgeId, EditMode, NodeId, NodeKind, NodeUpdate, WorkflowEditor};
use egui::Pos2;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One recorded editor input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum SessionCommand {
    /// Pointer pressed
    PointerDown {
        /// Screen x
        x: f32,
        /// Screen y
        y: f32,
    },
    /// Pointer moved
    PointerMove {
        /// Screen x
        x: f32,
        /// Screen y
        y: f32,
    },
    /// Pointer released
    PointerUp {
        /// Screen x
        x: f32,
        /// Screen y
        y: f32,
    },
    /// Pointer left the canvas
    Cancel,
    /// Toolbar mode switch
    SetMode {
        /// New mode
        mode: EditMode,
    },
    /// Relative zoom change
    Zoom {
        /// Amount added to the zoom factor
        delta: f32,
    },
    /// Toolbar zoom in
    ZoomIn,
    /// Toolbar zoom out
    ZoomOut,
    /// Toolbar zoom reset
    ResetZoom,
    /// Toolbar add-node button
    AddNode {
        /// Kind of node to add
        kind: NodeKind,
    },
    /// Node delete button
    DeleteNode {
        /// Node to delete
        id: NodeId,
    },
    /// Delete key on the selection
    DeleteSelected,
    /// Remove an edge by id
    DeleteEdge {
        /// Edge to delete
        id: EdgeId,
    },
    /// Click on an edge's midpoint handle
    ClickHandle {
        /// Screen x
        x: f32,
        /// Screen y
        y: f32,
    },
    /// Details-panel edit
    UpdateNode {
        /// Node to edit
        id: NodeId,
        /// Fields to change
        update: NodeUpdate,
    },
    /// Explicit selection change
    Select {
        /// Node to select, or none to clear
        #[serde(default)]
        id: Option<NodeId>,
    },
}

impl SessionCommand {
    /// Feed this command to the editor
    pub fn apply(self, editor: &mut WorkflowEditor) {
        match self {
            SessionCommand::PointerDown { x, y } => editor.on_pointer_down(Pos2::new(x, y)),
            SessionCommand::PointerMove { x, y } => editor.on_pointer_move(Pos2::new(x, y)),
            SessionCommand::PointerUp { x, y } => editor.on_pointer_up(Pos2::new(x, y)),
            SessionCommand::Cancel => editor.cancel_gesture(),
            SessionCommand::SetMode { mode } => editor.set_mode(mode),
            SessionCommand::Zoom { delta } => editor.set_zoom(delta),
            SessionCommand::ZoomIn => editor.zoom_in(),
            SessionCommand::ZoomOut => editor.zoom_out(),
            SessionCommand::ResetZoom => editor.reset_zoom(),
            SessionCommand::AddNode { kind } => {
                let id = editor.add_node(kind);
                tracing::debug!(node = %id, "Session added node");
            }
            SessionCommand::DeleteNode { id } => editor.delete_node(&id),
            SessionCommand::DeleteSelected => editor.delete_selected(),
            SessionCommand::DeleteEdge { id } => editor.delete_edge(&id),
            SessionCommand::ClickHandle { x, y } => {
                if editor.delete_edge_at(Pos2::new(x, y)).is_none() {
                    tracing::debug!(x, y, "No edge handle under click");
                }
            }
            SessionCommand::UpdateNode { id, update } => editor.update_node(&id, update),
            SessionCommand::Select { id } => editor.select_node(id),
        }
    }
}

/// Read a session file
pub fn load_session(path: &Path) -> Result<Vec<SessionCommand>> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| AppError::json(path, e))
}

/// Apply every command in order. Returns how many were applied.
pub fn replay(editor: &mut WorkflowEditor, commands: Vec<SessionCommand>) -> usize {
    let count = commands.len();
    for command in commands {
        command.apply(editor);
    }
    tracing::info!(commands = count, "Replayed session");
    count
}
