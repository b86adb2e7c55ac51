// SPDX-License-Identifier: MIT OR Apache-2.0
//! Canvas geometry and zoom state.
//!
//! All node geometry is expressed in canvas units. The viewport only scales
//! canvas units to screen units; there is no pan offset.

use crate::node::Position;
use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Node box width in canvas units
pub const NODE_WIDTH: f32 = 224.0;
/// Node box height in canvas units
pub const NODE_HEIGHT: f32 = 80.0;
/// Slack added on every side when hit-testing a connection drop
pub const HIT_TOLERANCE: f32 = 5.0;

/// Smallest zoom factor
pub const MIN_ZOOM: f32 = 0.5;
/// Largest zoom factor
pub const MAX_ZOOM: f32 = 2.0;
/// Zoom change per toolbar click
pub const ZOOM_STEP: f32 = 0.1;
/// Zoom factor of a fresh viewport
pub const DEFAULT_ZOOM: f32 = 1.0;

/// Fixed node size
pub fn node_size() -> Vec2 {
    Vec2::new(NODE_WIDTH, NODE_HEIGHT)
}

/// Bounding box of a node whose top-left corner is `position`
pub fn node_rect(position: Position) -> Rect {
    Rect::from_min_size(position.into(), node_size())
}

/// Center of a node whose top-left corner is `position`
pub fn node_center(position: Position) -> Pos2 {
    Pos2::from(position) + node_size() / 2.0
}

/// Editor-local zoom state. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    zoom: f32,
}

impl Viewport {
    /// Create a viewport at the default zoom
    pub fn new() -> Self {
        Self { zoom: DEFAULT_ZOOM }
    }

    /// Create a viewport at `zoom`, clamped to the allowed range
    pub fn with_zoom(zoom: f32) -> Self {
        Self {
            zoom: clamp_zoom(zoom),
        }
    }

    /// Current zoom factor
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Change the zoom by `delta`, clamped to `[MIN_ZOOM, MAX_ZOOM]`
    pub fn set_zoom(&mut self, delta: f32) {
        self.zoom = clamp_zoom(self.zoom + delta);
    }

    /// Zoom in one step
    pub fn zoom_in(&mut self) {
        self.set_zoom(ZOOM_STEP);
    }

    /// Zoom out one step
    pub fn zoom_out(&mut self) {
        self.set_zoom(-ZOOM_STEP);
    }

    /// Back to the default zoom
    pub fn reset_zoom(&mut self) {
        self.zoom = DEFAULT_ZOOM;
    }

    /// Convert a screen-space point to canvas units
    pub fn screen_to_canvas(&self, screen_pos: Pos2) -> Pos2 {
        Pos2::new(screen_pos.x / self.zoom, screen_pos.y / self.zoom)
    }

    /// Convert a canvas point to screen space
    pub fn canvas_to_screen(&self, canvas_pos: Pos2) -> Pos2 {
        Pos2::new(canvas_pos.x * self.zoom, canvas_pos.y * self.zoom)
    }

    /// Convert a canvas rectangle to screen space
    pub fn canvas_rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::from_min_size(self.canvas_to_screen(rect.min), rect.size() * self.zoom)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_zoom(zoom: f32) -> f32 {
    if zoom.is_nan() {
        return DEFAULT_ZOOM;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}
