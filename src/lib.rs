//! Shape Burst - a canvas physics toy
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (shapes, particles, collisions, world state)
//! - `renderer`: Tessellation and WebGPU rendering pipeline
//! - `settings`: Runtime configuration

pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{QualityPreset, Rules, Settings};
pub use sim::{FrameStatus, Mode, World, tick};

/// Simulation constants
///
/// All velocities are pixels per frame; there is no delta-time scaling.
pub mod consts {
    /// Added to a falling shape's y velocity every frame
    pub const GRAVITY: f32 = 0.05;
    /// Initial velocity components are drawn from [-MAX_SPAWN_SPEED, MAX_SPAWN_SPEED)
    pub const MAX_SPAWN_SPEED: f32 = 5.0;

    /// Shape size range (collision radius, render scale and mass)
    pub const SHAPE_SIZE_MIN: f32 = 25.0;
    pub const SHAPE_SIZE_MAX: f32 = 55.0;

    /// Post-collision spin cue: rotation_speed = (vx + vy) * SPIN_FACTOR
    pub const SPIN_FACTOR: f32 = 0.015;

    /// Particle size range (render only)
    pub const PARTICLE_SIZE_MIN: f32 = 2.0;
    pub const PARTICLE_SIZE_MAX: f32 = 7.0;
    /// Frames a particle lives
    pub const PARTICLE_LIFESPAN: i32 = 100;
    /// Particles spawned per destroyed shape
    pub const BURST_PARTICLES: usize = 20;

    /// Shape count that wins an add-mode run
    pub const SHAPE_GOAL: usize = 200;
    /// Shapes spawned when a run starts
    pub const INITIAL_SHAPES: usize = 10;
}
