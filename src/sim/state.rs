//! World state and interaction commands
//!
//! The world owns every live entity. Host callbacks (clicks, buttons,
//! resizes) mutate it synchronously between frames.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::point_in_shape;
use super::integrate::Viewport;
use super::shape::{Particle, Shape, ShapeKind};
use crate::consts::*;
use crate::settings::{Rules, Settings};

/// What a pointer click does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Click destroys a shape
    #[default]
    Explode,
    /// Click spawns a shape
    Add,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Explode => Mode::Add,
            Mode::Add => Mode::Explode,
        }
    }

    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Explode => "Mode: Explode",
            Mode::Add => "Mode: Add",
        }
    }
}

/// Run state, only consulted under [`Rules::Goal`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first start
    Initial,
    Playing,
    /// Run ended (won or stopped)
    GameOver,
}

/// All live shapes and particles plus interaction state
#[derive(Debug, Clone)]
pub struct World {
    /// One collection per kind; order within a collection is insertion order
    pub balls: Vec<Shape>,
    pub squares: Vec<Shape>,
    pub triangles: Vec<Shape>,
    pub particles: Vec<Particle>,
    pub mode: Mode,
    pub phase: GamePhase,
    pub rules: Rules,
    pub viewport: Viewport,
    /// Add-mode win threshold
    pub shape_goal: usize,
    /// Batch spawned on start
    pub initial_shapes: usize,
    rng: Pcg32,
    next_id: u32,
}

impl World {
    /// Empty free-play world
    pub fn new(viewport: Viewport, seed: u64) -> Self {
        Self {
            balls: Vec::new(),
            squares: Vec::new(),
            triangles: Vec::new(),
            particles: Vec::new(),
            mode: Mode::default(),
            phase: GamePhase::Initial,
            rules: Rules::FreePlay,
            viewport,
            shape_goal: SHAPE_GOAL,
            initial_shapes: INITIAL_SHAPES,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Empty world configured from settings
    pub fn from_settings(settings: &Settings, viewport: Viewport, seed: u64) -> Self {
        let mut world = Self::new(viewport, seed);
        world.rules = settings.rules;
        world.shape_goal = settings.shape_goal;
        world.initial_shapes = settings.initial_shapes;
        world
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Collection holding shapes of `kind`
    pub fn collection(&self, kind: ShapeKind) -> &Vec<Shape> {
        match kind {
            ShapeKind::Ball => &self.balls,
            ShapeKind::Square => &self.squares,
            ShapeKind::Triangle => &self.triangles,
        }
    }

    fn collection_mut(&mut self, kind: ShapeKind) -> &mut Vec<Shape> {
        match kind {
            ShapeKind::Ball => &mut self.balls,
            ShapeKind::Square => &mut self.squares,
            ShapeKind::Triangle => &mut self.triangles,
        }
    }

    /// Every shape, balls first, then squares, then triangles
    pub fn shapes(&self) -> impl Iterator<Item = &Shape> {
        self.balls
            .iter()
            .chain(self.squares.iter())
            .chain(self.triangles.iter())
    }

    pub fn shapes_mut(&mut self) -> impl Iterator<Item = &mut Shape> {
        self.balls
            .iter_mut()
            .chain(self.squares.iter_mut())
            .chain(self.triangles.iter_mut())
    }

    pub fn shape_count(&self) -> usize {
        self.balls.len() + self.squares.len() + self.triangles.len()
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shape_count() == 0 && self.particles.is_empty()
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            log::info!("Mode changed to {:?}", mode);
        }
        self.mode = mode;
    }

    /// Flip between explode and add, returning the new mode
    pub fn toggle_mode(&mut self) -> Mode {
        self.set_mode(self.mode.toggled());
        self.mode
    }

    /// Update the bounds and pull any out-of-bounds shapes back inside
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        let viewport = Viewport::new(width, height);
        self.viewport = viewport;
        for shape in self.shapes_mut() {
            viewport.clamp_shape(shape);
        }
        log::info!("Viewport resized to {}x{}", width, height);
    }

    /// Dispatch a click according to the current mode
    pub fn on_pointer_click(&mut self, x: f32, y: f32) {
        let point = Vec2::new(x, y);
        match self.mode {
            Mode::Explode => {
                self.explode_at(point);
            }
            Mode::Add => {
                self.add_shape_at(point);
            }
        }
    }

    /// Destroy the first shape under `point`, leaving a particle burst
    ///
    /// Scans balls, then squares, then triangles, each in stored order. At
    /// most one shape is destroyed per call. Returns the destroyed shape's id.
    pub fn explode_at(&mut self, point: Vec2) -> Option<u32> {
        let (kind, index) = ShapeKind::ALL.iter().find_map(|&kind| {
            self.collection(kind)
                .iter()
                .position(|shape| point_in_shape(point, shape))
                .map(|index| (kind, index))
        })?;

        let shape = self.collection_mut(kind).remove(index);
        let burst = shape.burst(&mut self.rng);
        self.particles.extend(burst);

        log::debug!(
            "Exploded {} {} at ({:.1}, {:.1})",
            kind.as_str(),
            shape.id,
            shape.pos.x,
            shape.pos.y
        );
        Some(shape.id)
    }

    /// Spawn a shape of random kind at `point`, returning its id
    pub fn add_shape_at(&mut self, point: Vec2) -> u32 {
        let kind = ShapeKind::random(&mut self.rng);
        let id = self.next_entity_id();
        let shape = Shape::spawn(id, kind, point, &mut self.rng);
        self.collection_mut(kind).push(shape);

        log::debug!(
            "Added {} {} at ({:.1}, {:.1})",
            kind.as_str(),
            id,
            point.x,
            point.y
        );
        id
    }

    /// Spawn `count` shapes at random points inside the viewport
    pub fn add_random_shapes(&mut self, count: usize) {
        for _ in 0..count {
            let point = self.viewport.random_point(&mut self.rng);
            self.add_shape_at(point);
        }
    }

    /// Remove every shape and particle
    pub fn clear(&mut self) {
        self.balls.clear();
        self.squares.clear();
        self.triangles.clear();
        self.particles.clear();
        log::info!("World cleared");
    }

    /// Begin a run (goal rules): fresh board, initial batch, playing
    pub fn start(&mut self) {
        match self.rules {
            Rules::FreePlay => log::info!("Free play runs continuously; start ignored"),
            Rules::Goal => {
                if self.phase == GamePhase::Playing {
                    return;
                }
                self.clear();
                self.add_random_shapes(self.initial_shapes);
                self.phase = GamePhase::Playing;
                log::info!("Run started in {:?} mode", self.mode);
            }
        }
    }

    /// End the current run (goal rules)
    pub fn stop(&mut self) {
        match self.rules {
            Rules::FreePlay => log::info!("Free play runs continuously; stop ignored"),
            Rules::Goal => {
                if self.phase == GamePhase::Playing {
                    self.phase = GamePhase::GameOver;
                    log::info!("Run stopped");
                }
            }
        }
    }

    /// Whether the frame step should run at all
    pub fn is_running(&self) -> bool {
        match self.rules {
            Rules::FreePlay => true,
            Rules::Goal => self.phase == GamePhase::Playing,
        }
    }

    /// Stop a run in progress, otherwise start one. Returns whether the
    /// world is running afterwards.
    pub fn toggle_run(&mut self) -> bool {
        if self.rules == Rules::Goal && self.phase == GamePhase::Playing {
            self.stop();
        } else {
            self.start();
        }
        self.is_running()
    }

    /// HUD counter line for the current board
    pub fn counter_text(&self) -> String {
        match self.rules {
            Rules::Goal => format!("Shapes: {} / {}", self.shape_count(), self.shape_goal),
            Rules::FreePlay => format!("Shapes: {}", self.shape_count()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::shape::Rgb;

    fn world() -> World {
        World::new(Viewport::new(800.0, 600.0), 12345)
    }

    fn placed(id: u32, kind: ShapeKind, x: f32, y: f32, size: f32) -> Shape {
        Shape {
            id,
            kind,
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            size,
            color: Rgb::new(id as u8, 10, 20),
            rotation: 0.0,
            rotation_speed: 0.0,
        }
    }

    #[test]
    fn test_add_random_shapes() {
        let mut world = world();
        world.add_random_shapes(10);

        assert_eq!(world.shape_count(), 10);
        assert!(world.shapes().all(|s| s.size >= SHAPE_SIZE_MIN && s.size < SHAPE_SIZE_MAX));
        assert!(world.shapes().all(|s| {
            s.pos.x >= 0.0 && s.pos.x < 800.0 && s.pos.y >= 0.0 && s.pos.y < 600.0
        }));
        for kind in ShapeKind::ALL {
            assert!(world.collection(kind).iter().all(|s| s.kind == kind));
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let mut world = world();
        world.add_random_shapes(30);
        let mut ids: Vec<u32> = world.shapes().map(|s| s.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 30);
    }

    #[test]
    fn test_explode_hit_removes_one_and_bursts() {
        let mut world = world();
        world.squares.push(placed(7, ShapeKind::Square, 200.0, 200.0, 30.0));
        world.balls.push(placed(8, ShapeKind::Ball, 500.0, 400.0, 30.0));

        let hit = world.explode_at(Vec2::new(210.0, 195.0));

        assert_eq!(hit, Some(7));
        assert!(world.squares.is_empty());
        assert_eq!(world.balls.len(), 1);
        assert_eq!(world.particles.len(), BURST_PARTICLES);
        assert!(world.particles.iter().all(|p| p.color == Rgb::new(7, 10, 20)));
        assert!(world.particles.iter().all(|p| p.pos == Vec2::new(200.0, 200.0)));
    }

    #[test]
    fn test_explode_miss_changes_nothing() {
        let mut world = world();
        world.add_random_shapes(5);
        let before: Vec<_> = world.shapes().map(|s| (s.id, s.pos)).collect();

        let hit = world.explode_at(Vec2::new(-500.0, -500.0));

        assert_eq!(hit, None);
        assert!(world.particles.is_empty());
        let after: Vec<_> = world.shapes().map(|s| (s.id, s.pos)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_explode_only_first_of_overlapping() {
        let mut world = world();
        world.triangles.push(placed(3, ShapeKind::Triangle, 100.0, 100.0, 40.0));
        world.balls.push(placed(1, ShapeKind::Ball, 100.0, 100.0, 40.0));
        world.balls.push(placed(2, ShapeKind::Ball, 105.0, 100.0, 40.0));

        assert_eq!(world.explode_at(Vec2::new(100.0, 100.0)), Some(1));
        assert_eq!(world.shape_count(), 2);
        assert_eq!(world.particles.len(), BURST_PARTICLES);

        assert_eq!(world.explode_at(Vec2::new(100.0, 100.0)), Some(2));
        assert_eq!(world.explode_at(Vec2::new(100.0, 100.0)), Some(3));
        assert_eq!(world.shape_count(), 0);
        assert_eq!(world.particles.len(), 3 * BURST_PARTICLES);
    }

    #[test]
    fn test_pointer_click_dispatches_by_mode() {
        let mut world = world();
        world.set_mode(Mode::Add);
        world.on_pointer_click(300.0, 300.0);
        assert_eq!(world.shape_count(), 1);

        assert_eq!(world.toggle_mode(), Mode::Explode);
        world.on_pointer_click(300.0, 300.0);
        assert_eq!(world.shape_count(), 0);
        assert_eq!(world.particles.len(), BURST_PARTICLES);
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut world = world();
        world.add_random_shapes(6);
        let first = world.shapes().next().map(|s| s.pos).unwrap();
        world.explode_at(first);

        world.clear();

        assert!(world.is_empty());
    }

    #[test]
    fn test_set_viewport_clamps() {
        let mut world = world();
        world.balls.push(placed(1, ShapeKind::Ball, 700.0, 500.0, 30.0));
        world.squares.push(placed(2, ShapeKind::Square, 100.0, 100.0, 30.0));

        world.set_viewport(400.0, 300.0);

        assert_eq!(world.viewport, Viewport::new(400.0, 300.0));
        assert_eq!(world.balls[0].pos, Vec2::new(370.0, 270.0));
        assert_eq!(world.squares[0].pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_start_stop_under_goal_rules() {
        let mut world = world();
        world.rules = Rules::Goal;
        world.particles.push(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: 3.0,
            color: Rgb::new(1, 2, 3),
            lifespan: 50,
        });
        assert!(!world.is_running());

        world.start();
        assert_eq!(world.phase, GamePhase::Playing);
        assert_eq!(world.shape_count(), INITIAL_SHAPES);
        assert!(world.particles.is_empty());
        assert!(world.is_running());

        // Starting again mid-run keeps the board
        world.add_random_shapes(2);
        world.start();
        assert_eq!(world.shape_count(), INITIAL_SHAPES + 2);

        world.stop();
        assert_eq!(world.phase, GamePhase::GameOver);
        assert!(!world.is_running());
    }

    #[test]
    fn test_free_play_always_running() {
        let mut world = world();
        assert!(world.is_running());
        world.stop();
        assert!(world.is_running());
        world.start();
        assert_eq!(world.shape_count(), 0);
    }

    #[test]
    fn test_toggle_run_starts_then_stops() {
        let mut world = world();
        world.rules = Rules::Goal;

        assert!(world.toggle_run());
        assert_eq!(world.phase, GamePhase::Playing);
        assert_eq!(world.shape_count(), INITIAL_SHAPES);

        assert!(!world.toggle_run());
        assert_eq!(world.phase, GamePhase::GameOver);

        // A finished run restarts from a fresh board
        world.add_random_shapes(3);
        assert!(world.toggle_run());
        assert_eq!(world.shape_count(), INITIAL_SHAPES);
    }

    #[test]
    fn test_toggle_run_free_play_keeps_running() {
        let mut world = world();
        assert!(world.toggle_run());
        assert!(world.toggle_run());
        assert_eq!(world.shape_count(), 0);
    }

    #[test]
    fn test_counter_text_tracks_board() {
        let mut world = world();
        world.add_random_shapes(4);
        assert_eq!(world.counter_text(), "Shapes: 4");

        world.rules = Rules::Goal;
        world.shape_goal = 5;
        world.add_shape_at(Vec2::new(10.0, 10.0));
        assert_eq!(world.counter_text(), "Shapes: 5 / 5");
    }

    #[test]
    fn test_same_seed_same_world() {
        let mut a = World::new(Viewport::default(), 42);
        let mut b = World::new(Viewport::default(), 42);
        a.add_random_shapes(8);
        b.add_random_shapes(8);
        let pa: Vec<_> = a.shapes().map(|s| (s.kind, s.pos, s.vel, s.size)).collect();
        let pb: Vec<_> = b.shapes().map(|s| (s.kind, s.pos, s.vel, s.size)).collect();
        assert_eq!(pa, pb);
    }
}
