//! Simulation module
//!
//! All physics and world logic lives here:
//! - One step per display frame, no timestep
//! - World-owned seeded RNG, no global state
//! - Drawing goes through the `DrawSink` trait; no rendering or platform dependencies

pub mod collision;
pub mod integrate;
pub mod shape;
pub mod state;
pub mod tick;

pub use collision::{point_in_shape, resolve, rotate};
pub use integrate::{Viewport, advance};
pub use shape::{Particle, Rgb, Shape, ShapeKind};
pub use state::{GamePhase, Mode, World};
pub use tick::{DrawSink, FrameStatus, tick};
