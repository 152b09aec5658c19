//! Shape and particle entities
//!
//! Every shape shares the same kinematic record; the kind only picks the
//! silhouette drawn for it.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Render silhouette of a shape. Has no effect on physics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Ball,
    Square,
    Triangle,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Ball, ShapeKind::Square, ShapeKind::Triangle];

    /// Pick a kind with equal probability
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Ball => "ball",
            ShapeKind::Square => "square",
            ShapeKind::Triangle => "triangle",
        }
    }
}

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Uniform random byte per channel
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::new(rng.random(), rng.random(), rng.random())
    }
}

/// Random velocity with each component in [-MAX_SPAWN_SPEED, MAX_SPAWN_SPEED)
fn random_velocity(rng: &mut impl Rng) -> Vec2 {
    Vec2::new(
        rng.random_range(-MAX_SPAWN_SPEED..MAX_SPAWN_SPEED),
        rng.random_range(-MAX_SPAWN_SPEED..MAX_SPAWN_SPEED),
    )
}

/// A physically simulated shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    /// Debug label only
    pub id: u32,
    pub kind: ShapeKind,
    /// Center, pixel space (origin top-left, y down)
    pub pos: Vec2,
    /// Pixels per frame
    pub vel: Vec2,
    /// Collision radius, render scale and mass. Never changes.
    pub size: f32,
    pub color: Rgb,
    /// Radians, grows without bound
    pub rotation: f32,
    /// Radians per frame, overwritten on every collision
    pub rotation_speed: f32,
}

impl Shape {
    /// Spawn a shape at `pos` with random velocity, size and color
    pub fn spawn(id: u32, kind: ShapeKind, pos: Vec2, rng: &mut impl Rng) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: random_velocity(rng),
            size: rng.random_range(SHAPE_SIZE_MIN..SHAPE_SIZE_MAX),
            color: Rgb::random(rng),
            rotation: 0.0,
            rotation_speed: 0.0,
        }
    }

    /// Spawn a burst of particles at this shape's position in its color
    pub fn burst(&self, rng: &mut impl Rng) -> Vec<Particle> {
        (0..BURST_PARTICLES)
            .map(|_| Particle::spawn(self.pos, self.color, &mut *rng))
            .collect()
    }
}

/// A short-lived fragment left behind by a destroyed shape
///
/// No gravity, no walls, no collisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Render radius
    pub size: f32,
    pub color: Rgb,
    /// Frames left; alive while positive
    pub lifespan: i32,
}

impl Particle {
    pub fn spawn(pos: Vec2, color: Rgb, rng: &mut impl Rng) -> Self {
        Self {
            pos,
            vel: random_velocity(rng),
            size: rng.random_range(PARTICLE_SIZE_MIN..PARTICLE_SIZE_MAX),
            color,
            lifespan: PARTICLE_LIFESPAN,
        }
    }

    /// Move one frame and age by one
    pub fn update(&mut self) {
        self.pos += self.vel;
        self.lifespan -= 1;
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.lifespan > 0
    }
}
