//! Per-frame shape integration: wall reflection, gravity, movement

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::shape::Shape;
use crate::consts::GRAVITY;

/// Simulation bounds in pixels, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Pull a shape back inside after the viewport shrinks
    pub fn clamp_shape(&self, shape: &mut Shape) {
        if shape.pos.x > self.width {
            shape.pos.x = self.width - shape.size;
        }
        if shape.pos.y > self.height {
            shape.pos.y = self.height - shape.size;
        }
        if shape.pos.x < 0.0 {
            shape.pos.x = shape.size;
        }
        if shape.pos.y < 0.0 {
            shape.pos.y = shape.size;
        }
    }

    /// Uniform random point inside the viewport
    pub fn random_point(&self, rng: &mut impl rand::Rng) -> Vec2 {
        Vec2::new(
            rng.random::<f32>() * self.width,
            rng.random::<f32>() * self.height,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Advance one shape by one frame
///
/// The order is significant: walls flip velocity first, gravity is added to
/// the possibly flipped velocity, and the position integrates the result.
/// Gravity stops once the bottom edge reaches the floor. Positions are not
/// clamped, so a fast shape can sit outside the bounds for a frame until the
/// next reflection turns it around.
pub fn advance(shape: &mut Shape, viewport: &Viewport) {
    if shape.pos.x + shape.size >= viewport.width || shape.pos.x - shape.size <= 0.0 {
        shape.vel.x = -shape.vel.x;
    }
    if shape.pos.y + shape.size >= viewport.height || shape.pos.y - shape.size <= 0.0 {
        shape.vel.y = -shape.vel.y;
    }

    if shape.pos.y + shape.size < viewport.height {
        shape.vel.y += GRAVITY;
    }

    shape.pos += shape.vel;
    shape.rotation += shape.rotation_speed;
}
