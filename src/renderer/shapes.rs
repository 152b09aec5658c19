//! Shape tessellation for 2D primitives
//!
//! All output stays in pixel space; the pipeline maps it to NDC.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::{DrawSink, Particle, Rgb, Shape, ShapeKind, Viewport};

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Rgb, segments: u32) -> Vec<Vertex> {
    let step = 2.0 * PI / segments as f32;
    (0..segments)
        .flat_map(|i| {
            // Triangle from center to edge
            let rim = |k: u32| center + radius * Vec2::from_angle(k as f32 * step);
            [center, rim(i), rim(i + 1)]
        })
        .map(|p| Vertex::new(p, color))
        .collect()
}

/// Generate vertices for a square of side `side` rotated about `center`
pub fn square(center: Vec2, side: f32, rotation: f32, color: Rgb) -> Vec<Vertex> {
    let half = side / 2.0;
    let turn = Vec2::from_angle(rotation);
    let [a, b, c, d] = [
        Vec2::new(-half, -half),
        Vec2::new(half, -half),
        Vec2::new(half, half),
        Vec2::new(-half, half),
    ]
    .map(|corner| center + turn.rotate(corner));

    [a, b, c, c, d, a]
        .into_iter()
        .map(|p| Vertex::new(p, color))
        .collect()
}

/// Generate vertices for an apex-up triangle rotated about `origin`
///
/// Corners sit at (0, -size), (size, size) and (-size, size) relative to the
/// origin before rotation.
pub fn triangle(origin: Vec2, size: f32, rotation: f32, color: Rgb) -> Vec<Vertex> {
    let turn = Vec2::from_angle(rotation);
    [
        Vec2::new(0.0, -size),
        Vec2::new(size, size),
        Vec2::new(-size, size),
    ]
    .into_iter()
    .map(|corner| Vertex::new(origin + turn.rotate(corner), color))
    .collect()
}

/// Triangles for one frame, filled through [`DrawSink`]
#[derive(Debug, Clone)]
pub struct VertexBatch {
    pub vertices: Vec<Vertex>,
    pub viewport: Viewport,
    segments: u32,
}

impl VertexBatch {
    pub fn new(segments: u32) -> Self {
        Self {
            vertices: Vec::new(),
            viewport: Viewport::default(),
            segments: segments.max(3),
        }
    }
}

impl DrawSink for VertexBatch {
    fn clear(&mut self, viewport: &Viewport) {
        self.vertices.clear();
        self.viewport = *viewport;
    }

    fn shape(&mut self, shape: &Shape) {
        let color = shape.color;
        let tris = match shape.kind {
            ShapeKind::Ball => circle(shape.pos, shape.size, color, self.segments),
            // The square hangs off its position by half a side, as on the canvas
            ShapeKind::Square => square(
                shape.pos + Vec2::splat(shape.size / 2.0),
                shape.size,
                shape.rotation,
                color,
            ),
            ShapeKind::Triangle => triangle(shape.pos, shape.size, shape.rotation, color),
        };
        self.vertices.extend(tris);
    }

    fn particle(&mut self, particle: &Particle) {
        self.vertices.extend(circle(
            particle.pos,
            particle.size,
            particle.color,
            self.segments,
        ));
    }
}
