//! Deterministic simulation module
//!
//! All physics and effect logic lives here. This module must be pure and deterministic:
//! - One frame per step, no wall-clock time
//! - Seeded RNG only
//! - Stable iteration order (insertion order of balls)
//! - No rendering or platform dependencies

pub mod ball;
pub mod collision;
pub mod effects;
pub mod options;
pub mod state;
pub mod tick;
pub mod vector;

pub use ball::Ball;
pub use collision::{
    BorderHits, check_collision, is_out_of_bounds, overlaps_stage, resolve_border_collision,
    resolve_collision,
};
pub use effects::{BlinkState, EffectWindow, GlowPhase, GlowState};
pub use options::BallOptions;
pub use state::{RngState, SimEvent, Stage, World};
pub use tick::{TickInput, tick};
pub use vector::Vector2D;
