//! Smoothed vertical follow camera
//!
//! Not gameplay-affecting: it only produces the world-to-screen translation
//! the (out-of-scope) renderer reads.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub y: f32,
    pub target_y: f32,
    pub lerp_speed: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self { y: 0.0, target_y: 0.0, lerp_speed: CAMERA_LERP }
    }

    /// Ease toward keeping the player in the lower screen band
    pub fn follow(&mut self, player_y: f32) {
        let anchor = SCREEN_HEIGHT * (1.0 - SCREEN_BOTTOM);
        self.target_y = player_y - anchor;
        self.y += (self.target_y - self.y) * self.lerp_speed;
    }

    /// World to screen translation for the renderer
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        Vec2::new(world.x, world.y - self.y)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
