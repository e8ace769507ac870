//! Simulation settings
//!
//! Persisted as JSON. Every field has a default, so a settings file only
//! needs the values it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimResult;
use crate::sim::BallOptions;

/// Effect preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EffectPreset {
    /// Kinematics only
    #[default]
    Plain,
    /// Alpha and color flash on every ball-ball collision
    Flash,
    /// Balls glow from the moment they spawn
    Glow,
    /// Balls grow in, flash on impact and burn out in an explosion
    Firework,
}

impl EffectPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectPreset::Plain => "Plain",
            EffectPreset::Flash => "Flash",
            EffectPreset::Glow => "Glow",
            EffectPreset::Firework => "Firework",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "plain" | "none" => Some(EffectPreset::Plain),
            "flash" => Some(EffectPreset::Flash),
            "glow" => Some(EffectPreset::Glow),
            "firework" | "fireworks" => Some(EffectPreset::Firework),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Last preset applied to `ball`
    pub preset: EffectPreset,

    // === Stage ===
    pub stage_width: f64,
    pub stage_height: f64,

    // === Population ===
    pub ball_count: usize,
    pub ball_radius: f64,
    /// Seed for placement and respawn randomness
    pub seed: u64,

    // === World rules ===
    /// How far outside the stage a ball may drift before it counts as out
    pub out_of_bounds_gap: f64,
    /// Balls that escape further than the gap re-enter from outside
    pub respawn_out_of_bounds: bool,
    /// Drop dead balls from the world at the end of each tick
    pub remove_dead: bool,
    /// Call `glow()` on every ball the world creates
    pub glow_on_spawn: bool,

    /// Template for every ball the world creates
    pub ball: BallOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preset: EffectPreset::Plain,

            stage_width: STAGE_WIDTH,
            stage_height: STAGE_HEIGHT,

            ball_count: BALL_COUNT,
            ball_radius: BALL_RADIUS,
            seed: 0,

            out_of_bounds_gap: OUT_OF_BOUNDS_GAP,
            respawn_out_of_bounds: false,
            remove_dead: false,
            glow_on_spawn: false,

            ball: BallOptions::default(),
        }
    }
}

impl Settings {
    /// Create settings from an effect preset (applies preset defaults)
    pub fn from_preset(preset: EffectPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply an effect preset to the ball template
    ///
    /// Kinematic options and the base color are left alone; every effect
    /// option is reset first so presets don't stack.
    pub fn apply_preset(&mut self, preset: EffectPreset) {
        let defaults = BallOptions::default();
        self.preset = preset;
        self.ball = BallOptions {
            mass: self.ball.mass,
            gravity: self.ball.gravity,
            elasticity: self.ball.elasticity,
            friction: self.ball.friction,
            color: self.ball.color.clone(),
            alpha: self.ball.alpha,
            ..defaults
        };
        self.glow_on_spawn = false;
        self.remove_dead = false;

        match preset {
            EffectPreset::Plain => {}
            EffectPreset::Flash => {
                self.ball.bouncing_alpha = true;
                self.ball.bouncing_color = Some("#ffffff".to_string());
            }
            EffectPreset::Glow => {
                self.ball.glowing_color = Some("#ffff00".to_string());
                self.glow_on_spawn = true;
            }
            EffectPreset::Firework => {
                self.ball.aging = true;
                self.ball.lifetime = Some(FIREWORK_LIFETIME);
                self.ball.bouncing_color = Some("#ffffff".to_string());
                self.ball.exploding_alpha = true;
                self.ball.exploding_color = Some("#ff8800".to_string());
                self.remove_dead = true;
            }
        }
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Could not load {}: {err}, using default settings", path.display());
                Self::default()
            }
        }
    }

    /// Save settings as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> SimResult<()> {
        let path = path.as_ref();
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

/// Total lifetime of a firework ball in frames, dying included
const FIREWORK_LIFETIME: f64 = 240.0;
