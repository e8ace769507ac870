//! Ball construction options
//!
//! Every tunable of a ball, each with its default. Colors are kept as the
//! raw strings the user supplied; they are validated once when the ball is
//! built, with invalid values falling back to the base color.

use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallOptions {
    // === Kinematics ===
    pub mass: f64,
    /// Scales velocity when applied to position
    pub gravity: f64,
    /// Velocity damping applied after any bounce
    pub elasticity: f64,
    /// Per-step velocity decay
    pub friction: f64,

    // === Appearance ===
    pub color: String,
    pub alpha: f64,
    /// Frames to live, `None` for immortal
    pub lifetime: Option<f64>,

    // === Aging ===
    /// Grow in at construction and shrink out before death
    pub aging: bool,
    pub borning_rate: u32,
    pub dying_rate: u32,

    // === Bounce flash ===
    pub bouncing_alpha: bool,
    pub bouncing_color: Option<String>,
    pub bouncing_rate: u32,

    // === Glow ===
    pub glowing_color: Option<String>,
    pub glowing_rate: u32,

    // === Blink ===
    pub blinking_color: Option<String>,
    pub blinking_rate: u32,

    // === Explode ===
    pub exploding_alpha: bool,
    pub exploding_color: Option<String>,
    /// Defaults to twice the base radius
    pub exploding_radius: Option<f64>,
    pub exploding_rate: u32,
}

impl Default for BallOptions {
    fn default() -> Self {
        Self {
            mass: DEFAULT_MASS,
            gravity: DEFAULT_GRAVITY,
            elasticity: DEFAULT_ELASTICITY,
            friction: DEFAULT_FRICTION,

            color: DEFAULT_COLOR.to_string(),
            alpha: 1.0,
            lifetime: None,

            aging: false,
            borning_rate: DEFAULT_BORNING_RATE,
            dying_rate: DEFAULT_DYING_RATE,

            bouncing_alpha: false,
            bouncing_color: None,
            bouncing_rate: DEFAULT_BOUNCING_RATE,

            glowing_color: None,
            glowing_rate: DEFAULT_GLOWING_RATE,

            blinking_color: None,
            blinking_rate: DEFAULT_BLINKING_RATE,

            exploding_alpha: false,
            exploding_color: None,
            exploding_radius: None,
            exploding_rate: DEFAULT_EXPLODING_RATE,
        }
    }
}

impl BallOptions {
    pub fn with_color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }

    pub fn with_lifetime(mut self, frames: f64) -> Self {
        self.lifetime = Some(frames);
        self
    }

    pub fn with_aging(mut self, borning_rate: u32, dying_rate: u32) -> Self {
        self.aging = true;
        self.borning_rate = borning_rate;
        self.dying_rate = dying_rate;
        self
    }

    pub fn with_bounce(mut self, color: Option<&str>, alpha: bool, rate: u32) -> Self {
        self.bouncing_color = color.map(str::to_string);
        self.bouncing_alpha = alpha;
        self.bouncing_rate = rate;
        self
    }

    pub fn with_glow(mut self, color: &str, rate: u32) -> Self {
        self.glowing_color = Some(color.to_string());
        self.glowing_rate = rate;
        self
    }

    pub fn with_blink(mut self, color: &str, rate: u32) -> Self {
        self.blinking_color = Some(color.to_string());
        self.blinking_rate = rate;
        self
    }

    pub fn with_explosion(
        mut self,
        color: Option<&str>,
        radius: Option<f64>,
        alpha: bool,
        rate: u32,
    ) -> Self {
        self.exploding_color = color.map(str::to_string);
        self.exploding_radius = radius;
        self.exploding_alpha = alpha;
        self.exploding_rate = rate;
        self
    }
}
