//! Ball Sim - 2D ball physics with cosmetic lifecycle effects
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball kinematics, collisions, effects, world)
//! - `color`: Hex color parsing and interpolation
//! - `snapshot`: GPU-ready per-ball instance data
//! - `settings`: JSON configuration with effect presets

pub mod color;
pub mod error;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use color::Rgb;
pub use error::{SimError, SimResult};
pub use settings::{EffectPreset, Settings};
pub use sim::{Ball, BallOptions, Vector2D, World};

/// Simulation constants
pub mod consts {
    /// Coefficient of restitution for ball-ball impulses
    pub const RESTITUTION: f64 = 0.85;
    /// Distance outside the stage where out-of-bounds balls are placed
    pub const OUT_OF_BOUNDS_GAP: f64 = 40.0;
    /// Lowest alpha a bounce flash dips to (0 when the base alpha is below it)
    pub const MIN_BOUNCING_ALPHA: f64 = 0.2;
    /// Displayed radius of a freshly born aging ball
    pub const BIRTH_RADIUS: f64 = 1.0;
    /// Random placement picks each velocity component in [0, RANDOM_SPEED_MAX)
    pub const RANDOM_SPEED_MAX: f64 = 10.0;
    /// A ball still waiting outside the stage and moving slower than this
    /// (per frame) is placed again
    pub const RESPAWN_STALL_SPEED: f64 = 0.01;

    /// Ball defaults
    pub const DEFAULT_MASS: f64 = 1.0;
    pub const DEFAULT_GRAVITY: f64 = 1.0;
    pub const DEFAULT_ELASTICITY: f64 = 0.98;
    pub const DEFAULT_FRICTION: f64 = 0.8;
    pub const DEFAULT_COLOR: &str = "#0000ff";

    /// Effect durations, in frames
    pub const DEFAULT_BORNING_RATE: u32 = 80;
    pub const DEFAULT_DYING_RATE: u32 = 60;
    pub const DEFAULT_BOUNCING_RATE: u32 = 60;
    pub const DEFAULT_GLOWING_RATE: u32 = 40;
    pub const DEFAULT_BLINKING_RATE: u32 = 40;
    pub const DEFAULT_EXPLODING_RATE: u32 = 60;

    /// Stage defaults
    pub const STAGE_WIDTH: f64 = 800.0;
    pub const STAGE_HEIGHT: f64 = 600.0;
    pub const BALL_RADIUS: f64 = 10.0;
    pub const BALL_COUNT: usize = 20;
}
