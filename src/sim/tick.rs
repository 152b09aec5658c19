//! Per-frame world step
//!
//! Runs once per display refresh. There is no timestep: velocities are in
//! pixels per frame, so simulation speed follows the refresh rate.

use super::collision::resolve;
use super::integrate::{Viewport, advance};
use super::shape::{Particle, Shape};
use super::state::{GamePhase, Mode, World};
use crate::settings::Rules;

/// Receives draw calls for one frame
///
/// The world calls `clear` once, then `shape` for each shape after it moves,
/// then `particle` for each surviving particle.
pub trait DrawSink {
    fn clear(&mut self, viewport: &Viewport);
    fn shape(&mut self, shape: &Shape);
    fn particle(&mut self, particle: &Particle);
}

/// Result of a frame, telling the host whether to schedule another
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameStatus {
    /// Frame ran; `shapes` is the counter to display
    Running { shapes: usize },
    /// Run just ended with a win
    Won(String),
    /// Not playing; nothing was simulated
    Stopped,
}

impl FrameStatus {
    /// Whether the host should request another frame
    pub fn keep_going(&self) -> bool {
        matches!(self, FrameStatus::Running { .. })
    }
}

/// Resolve every unordered pair of shapes exactly once
///
/// Quadratic in the shape count; boards stay small.
pub fn resolve_all_pairs(world: &mut World) {
    let mut shapes: Vec<&mut Shape> = world.shapes_mut().collect();
    for i in 0..shapes.len() {
        let (head, tail) = shapes.split_at_mut(i + 1);
        let a = &mut *head[i];
        for b in tail.iter_mut() {
            resolve(a, b);
        }
    }
}

/// Move, draw and reap particles; dead ones are dropped without drawing
pub fn update_particles(particles: &mut Vec<Particle>, sink: &mut impl DrawSink) {
    particles.retain_mut(|particle| {
        particle.update();
        if particle.is_alive() {
            sink.particle(particle);
            true
        } else {
            false
        }
    });
}

/// Check whether the current run has been won
fn check_goal(world: &World) -> Option<String> {
    match world.mode {
        Mode::Explode if world.is_empty() => Some("You cleared every shape!".to_string()),
        Mode::Add if world.shape_count() >= world.shape_goal => {
            Some(format!("You filled the screen with {} shapes!", world.shape_goal))
        }
        _ => None,
    }
}

/// Advance the world by one frame and draw it
pub fn tick(world: &mut World, sink: &mut impl DrawSink) -> FrameStatus {
    if !world.is_running() {
        return FrameStatus::Stopped;
    }

    sink.clear(&world.viewport);

    resolve_all_pairs(world);

    let viewport = world.viewport;
    for shape in world.shapes_mut() {
        advance(shape, &viewport);
        sink.shape(shape);
    }

    update_particles(&mut world.particles, sink);

    if world.rules == Rules::Goal {
        if let Some(message) = check_goal(world) {
            world.phase = GamePhase::GameOver;
            log::info!("{}", message);
            return FrameStatus::Won(message);
        }
    }

    FrameStatus::Running {
        shapes: world.shape_count(),
    }
}
