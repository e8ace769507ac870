//! World state and core simulation types
//!
//! Everything needed to replay a run deterministically lives here: the
//! stage, the balls in stable order, the seed and the tick counter.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::options::BallOptions;
use crate::settings::Settings;
use crate::snapshot::BallInstance;

/// The rectangle balls bounce around in, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub width: f64,
    pub height: f64,
}

/// Something that happened during the last tick
///
/// Indices refer to `World::balls` after the tick's stepping and before
/// dead balls are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Balls `a < b` exchanged momentum
    BallCollision { a: usize, b: usize },
    /// Ball bounced off at least one border
    BorderCollision { index: usize },
    /// Ball died this tick
    Died { index: usize },
    /// Ball escaped, or stalled before entering, and was placed outside the stage again
    Respawned { index: usize },
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Generator for setup-time placement
    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }

    /// Independent generator for one tick, so replaying from any saved
    /// tick reproduces the same draws
    pub fn rng_for_tick(&self, tick: u64) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed ^ tick.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}

/// Complete world state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub stage: Stage,
    /// Balls in insertion order
    pub balls: Vec<Ball>,
    pub rng_state: RngState,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Radius of balls created with `fill`
    pub ball_radius: f64,
    pub out_of_bounds_gap: f64,
    pub respawn_out_of_bounds: bool,
    pub remove_dead: bool,
    /// Events of the last tick
    #[serde(skip)]
    pub events: Vec<SimEvent>,
}

impl World {
    /// Create a world holding `settings.ball_count` balls at the origin
    pub fn new(settings: &Settings) -> Self {
        let mut world = Self {
            stage: Stage {
                width: settings.stage_width,
                height: settings.stage_height,
            },
            balls: Vec::with_capacity(settings.ball_count),
            rng_state: RngState::new(settings.seed),
            time_ticks: 0,
            ball_radius: settings.ball_radius,
            out_of_bounds_gap: settings.out_of_bounds_gap,
            respawn_out_of_bounds: settings.respawn_out_of_bounds,
            remove_dead: settings.remove_dead,
            events: Vec::new(),
        };

        world.fill(settings.ball_count, &settings.ball);
        if settings.glow_on_spawn {
            for ball in &mut world.balls {
                ball.glow();
            }
        }
        world
    }

    pub fn push(&mut self, ball: Ball) {
        self.balls.push(ball);
    }

    /// Append `count` balls at the origin built from `options`
    pub fn fill(&mut self, count: usize, options: &BallOptions) {
        let radius = self.ball_radius;
        self.balls
            .extend((0..count).map(|_| Ball::new(0.0, 0.0, radius, options)));
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    /// Number of balls that are not dead
    pub fn alive_count(&self) -> usize {
        self.balls.iter().filter(|b| !b.is_dead()).count()
    }

    /// Random position and speed inside the stage for every ball
    pub fn scatter_in_bounds(&mut self) {
        let mut rng = self.rng_state.to_rng();
        let Stage { width, height } = self.stage;
        for ball in &mut self.balls {
            ball.set_random_position_and_speed_in_bounds(&mut rng, width, height);
        }
    }

    /// Change the stage size; balls outside it are pushed back in by the
    /// next tick's border pass
    pub fn resize(&mut self, width: f64, height: f64) {
        log::debug!("stage resized to {width}x{height}");
        self.stage = Stage { width, height };
    }

    /// Render instances for every ball that is not dead
    pub fn instances(&self) -> Vec<BallInstance> {
        self.balls
            .iter()
            .filter(|b| !b.is_dead())
            .map(BallInstance::from)
            .collect()
    }
}
