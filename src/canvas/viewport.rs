//! Viewport transform between screen and flow coordinates

use crate::workflow::Position;
use serde::{Deserialize, Serialize};

/// Pan/zoom state of the canvas plus the size of its screen area
///
/// A flow point `p` is drawn at `p * zoom + (x, y)` on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Viewport {
    pub fn screen_to_flow(&self, screen_x: f64, screen_y: f64) -> Position {
        let zoom = if self.zoom > 0.0 { self.zoom } else { 1.0 };
        Position::new((screen_x - self.x) / zoom, (screen_y - self.y) / zoom)
    }

    /// Flow coordinate under the center of the visible area
    pub fn center(&self) -> Position {
        self.screen_to_flow(self.width / 2.0, self.height / 2.0)
    }
}
