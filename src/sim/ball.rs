//! The ball entity: kinematics, lifecycle and displayed appearance
//!
//! A ball keeps an immutable-by-convention *base* radius/color/alpha and a
//! *displayed* radius/color/alpha that is re-derived every step from the
//! frame counter and the effect states in [`super::effects`].
//!
//! Lifecycle is monotonic: alive, then optionally dying, then dead. A dead
//! ball is frozen; stepping, collisions and effect triggers leave it alone.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision;
use super::effects::{BlinkState, EffectWindow, GlowPhase, GlowState};
use super::options::BallOptions;
use crate::color::Rgb;
use crate::consts::*;
use crate::error::validate_alpha;

/// A circular body moving inside a rectangular stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub(crate) pos: DVec2,
    pub(crate) vel: DVec2,
    pub(crate) mass: f64,
    pub(crate) gravity: f64,
    pub(crate) elasticity: f64,
    pub(crate) friction: f64,

    base_radius: f64,
    pub(crate) radius: f64,
    base_color: Rgb,
    color: Rgb,
    base_alpha: f64,
    alpha: f64,

    /// Remaining frames, infinite for an immortal ball
    #[serde(with = "lifetime_serde")]
    lifetime: f64,
    dying: bool,
    dead: bool,
    /// Incremented once per step, drives every effect
    frame: u64,
    /// Set by out-of-bounds placement until the ball has entered the stage
    temporary_out_of_bounds: bool,

    aging: bool,
    borning_rate: u32,
    dying_rate: u32,

    bouncing_alpha: bool,
    bouncing_color: Rgb,
    bouncing_rate: u32,
    min_bouncing_alpha: f64,

    glowing_color: Rgb,
    glowing_rate: u32,

    blinking_color: Rgb,
    blinking_rate: u32,

    exploding_alpha: bool,
    exploding_color: Rgb,
    exploding_radius: f64,
    exploding_rate: u32,

    bounce: EffectWindow,
    explosion: EffectWindow,
    glow: GlowState,
    blink: BlinkState,
}

/// Parse an effect color, falling back to the base color
fn effect_color(name: &str, value: Option<&str>, base: Rgb) -> Rgb {
    match value {
        None => base,
        Some(code) => Rgb::parse(code).unwrap_or_else(|err| {
            log::warn!("{name}: {err}, using base color {base}");
            base
        }),
    }
}

/// Rates divide frame counts; zero is bumped to one
fn sanitize_rate(name: &str, rate: u32) -> u32 {
    if rate == 0 {
        log::warn!("{name} must be at least 1 frame, using 1");
        1
    } else {
        rate
    }
}

/// Floor of the bounce alpha dip
fn min_bouncing_alpha(alpha: f64) -> f64 {
    if alpha > MIN_BOUNCING_ALPHA { MIN_BOUNCING_ALPHA } else { 0.0 }
}

impl Ball {
    /// Build a ball at `(x, y)` with zero velocity
    ///
    /// Invalid option values never abort construction: they are reported
    /// with `log::warn!` and replaced by their defaults.
    pub fn new(x: f64, y: f64, radius: f64, options: &BallOptions) -> Self {
        let base_color = Rgb::parse(&options.color).unwrap_or_else(|err| {
            log::warn!("color: {err}, using {DEFAULT_COLOR}");
            Rgb::BLUE
        });

        let alpha = validate_alpha(options.alpha).unwrap_or_else(|err| {
            log::warn!("alpha: {err}, using 1");
            1.0
        });

        let exploding_radius = options.exploding_radius.unwrap_or(2.0 * radius);
        if exploding_radius < radius {
            log::warn!("exploding_radius {exploding_radius} < radius {radius}, won't grow");
        }

        let mut ball = Self {
            pos: DVec2::new(x, y),
            vel: DVec2::ZERO,
            mass: options.mass,
            gravity: options.gravity,
            elasticity: options.elasticity,
            friction: options.friction,

            base_radius: radius,
            radius,
            base_color,
            color: base_color,
            base_alpha: alpha,
            alpha,

            lifetime: options.lifetime.unwrap_or(f64::INFINITY),
            dying: false,
            dead: false,
            frame: 0,
            temporary_out_of_bounds: false,

            aging: options.aging,
            borning_rate: sanitize_rate("borning_rate", options.borning_rate),
            dying_rate: sanitize_rate("dying_rate", options.dying_rate),

            bouncing_alpha: options.bouncing_alpha,
            bouncing_color: effect_color(
                "bouncing_color",
                options.bouncing_color.as_deref(),
                base_color,
            ),
            bouncing_rate: sanitize_rate("bouncing_rate", options.bouncing_rate),
            min_bouncing_alpha: min_bouncing_alpha(alpha),

            glowing_color: effect_color(
                "glowing_color",
                options.glowing_color.as_deref(),
                base_color,
            ),
            glowing_rate: sanitize_rate("glowing_rate", options.glowing_rate),

            blinking_color: effect_color(
                "blinking_color",
                options.blinking_color.as_deref(),
                base_color,
            ),
            blinking_rate: sanitize_rate("blinking_rate", options.blinking_rate),

            exploding_alpha: options.exploding_alpha,
            exploding_color: effect_color(
                "exploding_color",
                options.exploding_color.as_deref(),
                base_color,
            ),
            exploding_radius,
            exploding_rate: sanitize_rate("exploding_rate", options.exploding_rate),

            bounce: EffectWindow::Inactive,
            explosion: EffectWindow::Inactive,
            glow: GlowState::Off,
            blink: BlinkState::Off,
        };

        if ball.aging {
            ball.born();
        }
        ball
    }

    // === Simulation ===

    /// Advance one frame, with `(dx, dy)` added to the velocity before friction
    ///
    /// Position moves by `gravity * velocity`, then the perturbed velocity
    /// decays by `friction`, then radius, alpha and color are re-derived and
    /// the ball ages by one frame. Inputs are not range checked.
    pub fn step(&mut self, dx: f64, dy: f64) -> &mut Self {
        if self.dead {
            return self;
        }
        self.frame += 1;
        self.pos += self.vel * self.gravity;
        self.vel = (self.vel + DVec2::new(dx, dy)) * self.friction;
        self.update_radius();
        self.update_alpha();
        self.update_color();
        self.age();
        self
    }

    fn update_radius(&mut self) {
        if self.is_exploding() && self.exploding_radius > self.base_radius {
            let progress = self.explosion.progress(self.frame);
            self.radius = if progress >= 1.0 {
                self.exploding_radius
            } else {
                let grown = (self.exploding_radius - self.base_radius) * progress;
                (self.base_radius + grown).min(self.exploding_radius)
            };
            return;
        }

        // Growing in
        if self.aging && !self.dying && self.radius < self.base_radius {
            let growth = self.base_radius / self.borning_rate as f64;
            self.radius = (self.radius + growth).min(self.base_radius);
        }

        // Shrinking out: linear to zero over the frames left to live
        if self.dying && self.lifetime <= self.dying_rate as f64 {
            let remaining = self.lifetime - 1.0;
            self.radius = if remaining < 1.0 {
                0.0
            } else {
                (self.radius * remaining / self.lifetime).max(0.0)
            };
        }
    }

    fn update_alpha(&mut self) {
        let frame = self.frame;
        self.alpha = if self.is_exploding() && self.exploding_alpha {
            let progress = self.explosion.progress(frame);
            (self.base_alpha * (1.0 - progress)).clamp(0.0, self.base_alpha)
        } else if self.is_bouncing() && self.bouncing_alpha {
            let progress = self.bounce.progress(frame);
            let span = self.base_alpha - self.min_bouncing_alpha;
            (self.min_bouncing_alpha + span * progress).clamp(0.0, self.base_alpha)
        } else {
            self.base_alpha
        };
    }

    /// Explode beats bounce, bounce beats glow, glow beats blink
    fn update_color(&mut self) {
        let frame = self.frame;
        if self.is_exploding() {
            self.color = self.explosion.color_at(frame, self.base_color, self.exploding_color);
            self.rearm_cycles();
        } else if self.is_bouncing() && self.bouncing_color != self.base_color {
            self.color = self.bounce.color_at(frame, self.bouncing_color, self.base_color);
            self.rearm_cycles();
        } else if let Some((phase, progress)) = self.glow.advance(frame, self.glowing_rate) {
            self.color = match phase {
                GlowPhase::Rising => self.base_color.lerp(self.glowing_color, progress),
                GlowPhase::Falling => self.glowing_color.lerp(self.base_color, progress),
            };
        } else if let Some(showing_alt) = self.blink.advance(frame, self.blinking_rate) {
            self.color = if showing_alt { self.blinking_color } else { self.base_color };
        } else {
            self.color = self.base_color;
        }
    }

    /// Glow and blink restart from the base color once an override ends
    fn rearm_cycles(&mut self) {
        if self.glow.is_on() {
            self.glow = GlowState::rising(self.frame + 1, self.glowing_rate);
        }
        if let BlinkState::On { showing_alt } = &mut self.blink {
            *showing_alt = false;
        }
    }

    fn age(&mut self) {
        self.lifetime -= 1.0;
        if self.lifetime <= self.dying_rate as f64 {
            self.dying = true;
        }
        if self.lifetime < 1.0 {
            self.die();
        }
    }

    fn born(&mut self) {
        self.radius = BIRTH_RADIUS;
        self.dying = false;
        self.dead = false;
    }

    // === Lifecycle and effect triggers ===

    /// Flag the ball as dead immediately
    ///
    /// Open effect windows close; the displayed radius, color and alpha
    /// keep their last values.
    pub fn die(&mut self) -> &mut Self {
        if !self.dead {
            log::debug!("ball died at frame {}", self.frame);
        }
        self.dead = true;
        self.explosion = EffectWindow::Inactive;
        self.bounce = EffectWindow::Inactive;
        self
    }

    /// Start dying: the ball shrinks out over `dying_rate` frames, then dies
    pub fn to_death(&mut self) -> &mut Self {
        if self.dead {
            return self;
        }
        self.dying = true;
        self.lifetime = self.dying_rate as f64;
        self
    }

    /// One-shot explosion; the ball dies when the window closes
    ///
    /// Cancels dying and any bounce flash, resets the displayed appearance
    /// to base values. Calling it again while exploding restarts the window.
    pub fn explode(&mut self) -> &mut Self {
        if self.dead {
            return self;
        }
        log::debug!("ball exploding at frame {} for {} frames", self.frame, self.exploding_rate);
        self.dying = false;
        self.radius = self.base_radius;
        self.color = self.base_color;
        self.alpha = self.base_alpha;
        self.lifetime = self.exploding_rate as f64;
        self.bounce = EffectWindow::Inactive;
        self.explosion = EffectWindow::open(self.frame, self.exploding_rate);
        self
    }

    /// Bounce feedback, triggered by ball-ball collisions
    ///
    /// Opens (or reopens) the bounce window when alpha flashing is enabled
    /// or the bouncing color differs from the base color. Ignored while
    /// exploding.
    pub fn flash(&mut self) -> &mut Self {
        if self.dead || self.is_exploding() {
            return self;
        }
        if self.bouncing_alpha {
            self.bounce = EffectWindow::open(self.frame, self.bouncing_rate);
            self.alpha = self.min_bouncing_alpha;
        }
        if self.bouncing_color != self.base_color {
            self.bounce = EffectWindow::open(self.frame, self.bouncing_rate);
            self.color = self.bouncing_color;
        }
        self
    }

    /// Start glowing, no-op if already glowing
    pub fn glow(&mut self) -> &mut Self {
        if !self.glow.is_on() {
            self.start_glowing();
        }
        self
    }

    pub fn stop_glow(&mut self) -> &mut Self {
        if self.glow.is_on() {
            self.stop_glowing();
        }
        self
    }

    /// Start blinking, no-op if already blinking
    pub fn blink(&mut self) -> &mut Self {
        if !self.blink.is_on() {
            self.start_blinking();
        }
        self
    }

    pub fn stop_blink(&mut self) -> &mut Self {
        if self.blink.is_on() {
            self.stop_blinking();
        }
        self
    }

    fn start_glowing(&mut self) {
        if self.dead || self.is_exploding() {
            return;
        }
        if self.blink.is_on() {
            self.stop_blinking();
        }
        if self.glowing_color == self.base_color {
            self.glow = GlowState::Off;
            return;
        }
        self.glow = GlowState::rising(self.frame, self.glowing_rate);
        if let Some((_, progress)) = self.glow.advance(self.frame, self.glowing_rate) {
            if !self.color_overridden() {
                self.color = self.base_color.lerp(self.glowing_color, progress);
            }
        }
    }

    fn stop_glowing(&mut self) {
        self.glow = GlowState::Off;
        if !self.color_overridden() {
            self.color = self.base_color;
        }
    }

    /// An explosion or a colored bounce flash currently owns the color
    fn color_overridden(&self) -> bool {
        self.is_exploding() || (self.is_bouncing() && self.bouncing_color != self.base_color)
    }

    fn start_blinking(&mut self) {
        if self.dead || self.is_exploding() {
            return;
        }
        if self.glow.is_on() {
            self.stop_glowing();
        }
        if self.blinking_color == self.base_color {
            self.blink = BlinkState::Off;
            return;
        }
        self.blink = BlinkState::On { showing_alt: false };
        if !self.color_overridden() {
            self.color = self.base_color;
        }
    }

    fn stop_blinking(&mut self) {
        self.blink = BlinkState::Off;
        if !self.color_overridden() {
            self.color = self.base_color;
        }
    }

    // === Collisions ===

    /// Circles touching or overlapping
    pub fn check_collision(&self, other: &Ball) -> bool {
        collision::check_collision(self, other)
    }

    /// Impulse-based response against `other`; true if velocities changed
    pub fn resolve_collision(&mut self, other: &mut Ball) -> bool {
        collision::resolve_collision(self, other)
    }

    /// Bounce off the stage borders; true if any border was hit
    pub fn resolve_border_collision(&mut self, stage_width: f64, stage_height: f64) -> bool {
        collision::resolve_border_collision(self, stage_width, stage_height).any()
    }

    pub fn is_out_of_bounds(&self, stage_width: f64, stage_height: f64, gap: f64) -> bool {
        collision::is_out_of_bounds(self, stage_width, stage_height, gap)
    }

    /// Vector from `other` to this ball
    pub fn vector_to(&self, other: &Ball) -> DVec2 {
        self.pos - other.pos
    }

    pub fn distance_to(&self, other: &Ball) -> f64 {
        self.pos.distance(other.pos)
    }

    // === Placement ===

    /// Uniform position inside the stage, velocity components in [0, 10)
    pub fn set_random_position_and_speed_in_bounds<R: Rng>(
        &mut self,
        rng: &mut R,
        stage_width: f64,
        stage_height: f64,
    ) -> &mut Self {
        self.pos = DVec2::new(
            rng.random::<f64>() * stage_width,
            rng.random::<f64>() * stage_height,
        );
        self.vel = DVec2::new(
            rng.random::<f64>() * RANDOM_SPEED_MAX,
            rng.random::<f64>() * RANDOM_SPEED_MAX,
        );
        self
    }

    /// Place the ball `gap` outside a random horizontal and vertical side,
    /// heading into the stage, and flag it temporarily out of bounds
    pub fn set_random_position_and_speed_out_of_bounds<R: Rng>(
        &mut self,
        rng: &mut R,
        stage_width: f64,
        stage_height: f64,
        gap: f64,
    ) -> &mut Self {
        if rng.random::<f64>() > 0.5 {
            self.pos.x = -gap;
            self.vel.x = rng.random::<f64>() * RANDOM_SPEED_MAX;
        } else {
            self.pos.x = stage_width + gap;
            self.vel.x = -rng.random::<f64>() * RANDOM_SPEED_MAX;
        }

        if rng.random::<f64>() > 0.5 {
            self.pos.y = -gap;
            self.vel.y = rng.random::<f64>() * RANDOM_SPEED_MAX;
        } else {
            self.pos.y = stage_height + gap;
            self.vel.y = -rng.random::<f64>() * RANDOM_SPEED_MAX;
        }
        self.temporary_out_of_bounds = true;
        self
    }

    // === Getters ===

    pub fn x(&self) -> f64 {
        self.pos.x
    }

    pub fn y(&self) -> f64 {
        self.pos.y
    }

    pub fn position(&self) -> DVec2 {
        self.pos
    }

    pub fn velocity_x(&self) -> f64 {
        self.vel.x
    }

    pub fn velocity_y(&self) -> f64 {
        self.vel.y
    }

    pub fn velocity(&self) -> DVec2 {
        self.vel
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    pub fn elasticity(&self) -> f64 {
        self.elasticity
    }

    pub fn friction(&self) -> f64 {
        self.friction
    }

    /// Displayed radius
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn base_radius(&self) -> f64 {
        self.base_radius
    }

    /// Displayed color
    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn base_color(&self) -> Rgb {
        self.base_color
    }

    /// Displayed alpha
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn base_alpha(&self) -> f64 {
        self.base_alpha
    }

    pub fn lifetime(&self) -> f64 {
        self.lifetime
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_dying(&self) -> bool {
        self.dying
    }

    pub fn is_aging(&self) -> bool {
        self.aging
    }

    pub fn is_bouncing(&self) -> bool {
        self.bounce.is_active(self.frame)
    }

    pub fn is_exploding(&self) -> bool {
        self.explosion.is_active(self.frame)
    }

    pub fn is_glowing(&self) -> bool {
        self.glow.is_on()
    }

    pub fn is_blinking(&self) -> bool {
        self.blink.is_on()
    }

    pub fn temporary_out_of_bounds(&self) -> bool {
        self.temporary_out_of_bounds
    }

    pub fn borning_rate(&self) -> u32 {
        self.borning_rate
    }

    pub fn dying_rate(&self) -> u32 {
        self.dying_rate
    }

    pub fn bouncing_color(&self) -> Rgb {
        self.bouncing_color
    }

    pub fn bouncing_rate(&self) -> u32 {
        self.bouncing_rate
    }

    pub fn glowing_color(&self) -> Rgb {
        self.glowing_color
    }

    pub fn glowing_rate(&self) -> u32 {
        self.glowing_rate
    }

    pub fn blinking_color(&self) -> Rgb {
        self.blinking_color
    }

    pub fn blinking_rate(&self) -> u32 {
        self.blinking_rate
    }

    pub fn exploding_alpha(&self) -> bool {
        self.exploding_alpha
    }

    pub fn exploding_color(&self) -> Rgb {
        self.exploding_color
    }

    pub fn exploding_radius(&self) -> f64 {
        self.exploding_radius
    }

    pub fn exploding_rate(&self) -> u32 {
        self.exploding_rate
    }

    // === Setters ===

    pub fn set_x(&mut self, x: f64) -> &mut Self {
        self.pos.x = x;
        self
    }

    pub fn set_y(&mut self, y: f64) -> &mut Self {
        self.pos.y = y;
        self
    }

    pub fn set_position(&mut self, pos: DVec2) -> &mut Self {
        self.pos = pos;
        self
    }

    pub fn set_velocity_x(&mut self, vx: f64) -> &mut Self {
        self.vel.x = vx;
        self
    }

    pub fn set_velocity_y(&mut self, vy: f64) -> &mut Self {
        self.vel.y = vy;
        self
    }

    pub fn set_velocity(&mut self, vel: DVec2) -> &mut Self {
        self.vel = vel;
        self
    }

    pub fn set_mass(&mut self, mass: f64) -> &mut Self {
        self.mass = mass;
        self
    }

    pub fn set_gravity(&mut self, gravity: f64) -> &mut Self {
        self.gravity = gravity;
        self
    }

    pub fn set_elasticity(&mut self, elasticity: f64) -> &mut Self {
        self.elasticity = elasticity;
        self
    }

    pub fn set_friction(&mut self, friction: f64) -> &mut Self {
        self.friction = friction;
        self
    }

    pub fn set_temporary_out_of_bounds(&mut self, flag: bool) -> &mut Self {
        self.temporary_out_of_bounds = flag;
        self
    }

    /// Sets base and displayed radius; locked while exploding
    pub fn set_radius(&mut self, radius: f64) -> &mut Self {
        if self.is_exploding() {
            return self;
        }
        self.radius = radius;
        self.base_radius = radius;
        self
    }

    /// Sets base and displayed color, restarting glow; locked while exploding
    pub fn set_color(&mut self, color: Rgb) -> &mut Self {
        if self.is_exploding() {
            return self;
        }
        self.color = color;
        self.base_color = color;
        if self.glow.is_on() {
            self.start_glowing();
        }
        self
    }

    /// Like [`Ball::set_color`] from a hex code; invalid codes are ignored
    pub fn set_color_hex(&mut self, code: &str) -> &mut Self {
        match Rgb::parse(code) {
            Ok(color) => self.set_color(color),
            Err(err) => {
                log::warn!("set_color: {err}");
                self
            }
        }
    }

    /// Sets base and displayed alpha; invalid values and explosions lock it
    pub fn set_alpha(&mut self, alpha: f64) -> &mut Self {
        if self.is_exploding() {
            return self;
        }
        match validate_alpha(alpha) {
            Ok(alpha) => {
                self.alpha = alpha;
                self.base_alpha = alpha;
                self.min_bouncing_alpha = min_bouncing_alpha(alpha);
            }
            Err(err) => log::warn!("set_alpha: {err}"),
        }
        self
    }

    pub fn set_lifetime(&mut self, lifetime: f64) -> &mut Self {
        self.lifetime = lifetime;
        self
    }

    /// No effect once dying
    pub fn set_dying_rate(&mut self, rate: u32) -> &mut Self {
        if !self.dying {
            self.dying_rate = sanitize_rate("dying_rate", rate);
        }
        self
    }

    pub fn set_glowing_color(&mut self, color: Rgb) -> &mut Self {
        self.glowing_color = color;
        if self.glow.is_on() {
            self.start_glowing();
        }
        self
    }

    pub fn set_glowing_rate(&mut self, rate: u32) -> &mut Self {
        self.glowing_rate = sanitize_rate("glowing_rate", rate);
        if self.glow.is_on() {
            self.start_glowing();
        }
        self
    }

    pub fn set_blinking_color(&mut self, color: Rgb) -> &mut Self {
        self.blinking_color = color;
        if self.blink.is_on() {
            self.start_blinking();
        }
        self
    }

    pub fn set_blinking_rate(&mut self, rate: u32) -> &mut Self {
        self.blinking_rate = sanitize_rate("blinking_rate", rate);
        if self.blink.is_on() {
            self.start_blinking();
        }
        self
    }

    pub fn set_exploding_alpha(&mut self, fade: bool) -> &mut Self {
        if !self.is_exploding() {
            self.exploding_alpha = fade;
        }
        self
    }

    pub fn set_exploding_color(&mut self, color: Rgb) -> &mut Self {
        if !self.is_exploding() {
            self.exploding_color = color;
        }
        self
    }

    pub fn set_exploding_radius(&mut self, radius: f64) -> &mut Self {
        if !self.is_exploding() {
            if radius < self.base_radius {
                log::warn!(
                    "exploding_radius {radius} < radius {}, explosions won't grow",
                    self.base_radius
                );
            }
            self.exploding_radius = radius;
        }
        self
    }

    pub fn set_exploding_rate(&mut self, rate: u32) -> &mut Self {
        if !self.is_exploding() {
            self.exploding_rate = sanitize_rate("exploding_rate", rate);
        }
        self
    }
}

/// Infinite lifetimes are stored as `null`
mod lifetime_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(lifetime: &f64, s: S) -> Result<S::Ok, S::Error> {
        if lifetime.is_finite() {
            s.serialize_some(lifetime)
        } else {
            s.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::INFINITY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn plain(radius: f64) -> Ball {
        Ball::new(0.0, 0.0, radius, &BallOptions::default())
    }

    #[test]
    fn test_construction_defaults() {
        let b = plain(10.0);
        assert_eq!(b.mass(), 1.0);
        assert_eq!(b.gravity(), 1.0);
        assert_eq!(b.elasticity(), 0.98);
        assert_eq!(b.friction(), 0.8);
        assert_eq!(b.color().to_string(), "#0000ff");
        assert_eq!(b.alpha(), 1.0);
        assert!(b.lifetime().is_infinite());
        assert_eq!(b.exploding_radius(), 20.0);
        assert_eq!(b.velocity(), DVec2::ZERO);
        assert!(!b.is_dead() && !b.is_dying() && !b.is_exploding());
    }

    #[test]
    fn test_invalid_options_fall_back() {
        let opts = BallOptions {
            color: "not a color".into(),
            alpha: 4.0,
            glowing_color: Some("#12".into()),
            blinking_rate: 0,
            ..Default::default()
        };
        let mut b = Ball::new(0.0, 0.0, 5.0, &opts);
        assert_eq!(b.base_color(), Rgb::BLUE);
        assert_eq!(b.alpha(), 1.0);
        assert_eq!(b.glowing_color(), Rgb::BLUE);
        assert_eq!(b.blinking_rate(), 1);
        // Glow color equals base color: glowing is a no-op
        b.glow();
        assert!(!b.is_glowing());
    }

    #[test]
    fn test_step_applies_gravity_then_friction() {
        let mut b = plain(5.0);
        b.set_velocity(DVec2::new(2.0, -1.0));
        b.step(1.0, 0.5);
        assert_eq!(b.frame(), 1);
        assert_eq!(b.position(), DVec2::new(2.0, -1.0));
        assert!(close(b.velocity_x(), 0.8 * 3.0));
        assert!(close(b.velocity_y(), 0.8 * -0.5));

        let opts = BallOptions { gravity: 0.5, friction: 1.0, ..Default::default() };
        let mut b = Ball::new(0.0, 0.0, 5.0, &opts);
        b.set_velocity(DVec2::new(4.0, 0.0));
        b.step(0.0, 0.0).step(0.0, 0.0);
        assert_eq!(b.x(), 4.0);
    }

    #[test]
    fn test_nan_propagates() {
        let mut b = plain(5.0);
        b.step(f64::NAN, 0.0);
        assert!(b.velocity_x().is_nan());
        b.step(0.0, 0.0);
        assert!(b.x().is_nan());
        assert!(!b.y().is_nan());
    }

    #[test]
    fn test_dead_ball_is_frozen() {
        let opts = BallOptions { friction: 1.0, ..Default::default() }.with_lifetime(3.0);
        let mut b = Ball::new(0.0, 0.0, 8.0, &opts);
        b.set_velocity(DVec2::new(5.0, 5.0));
        b.step(0.0, 0.0).step(0.0, 0.0);
        assert!(!b.is_dead());
        b.step(0.0, 0.0);
        assert!(b.is_dead());
        assert!(b.is_dying());

        let (pos, vel, radius, frame) = (b.position(), b.velocity(), b.radius(), b.frame());
        for _ in 0..10 {
            b.step(3.0, 3.0);
        }
        assert_eq!(b.position(), pos);
        assert_eq!(b.velocity(), vel);
        assert_eq!(b.radius(), radius);
        assert_eq!(b.frame(), frame);

        // Triggers don't resurrect or reanimate
        b.explode();
        assert!(!b.is_exploding());
        assert!(b.is_dead());
    }

    #[test]
    fn test_immortal_ball_never_dies() {
        let mut b = plain(5.0);
        for _ in 0..1000 {
            b.step(0.0, 0.0);
        }
        assert!(!b.is_dying() && !b.is_dead());
        assert_eq!(b.radius(), 5.0);
    }

    #[test]
    fn test_aging_round_trip() {
        let opts = BallOptions::default().with_aging(10, 10).with_lifetime(25.0);
        let mut b = Ball::new(0.0, 0.0, 20.0, &opts);
        assert_eq!(b.radius(), BIRTH_RADIUS);

        let mut radii = vec![b.radius()];
        let mut steps = 0;
        while !b.is_dead() && steps < 1000 {
            b.step(0.0, 0.0);
            radii.push(b.radius());
            steps += 1;
        }
        assert_eq!(steps, 25);
        assert_eq!(*radii.last().unwrap(), 0.0);

        let peak = radii.iter().position(|&r| r == 20.0).expect("reaches base radius");
        assert!(radii[..=peak].windows(2).all(|w| w[0] <= w[1]));
        assert!(radii[peak..].windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_to_death_shrinks_from_current_radius() {
        let opts = BallOptions { dying_rate: 4, ..Default::default() };
        let mut b = Ball::new(0.0, 0.0, 8.0, &opts);
        b.to_death();
        assert!(b.is_dying());
        assert_eq!(b.lifetime(), 4.0);

        let mut radii = Vec::new();
        while !b.is_dead() {
            b.step(0.0, 0.0);
            radii.push(b.radius());
        }
        assert_eq!(radii, vec![6.0, 4.0, 2.0, 0.0]);
    }

    #[test]
    fn test_set_dying_rate_locked_while_dying() {
        let mut b = plain(5.0);
        b.set_dying_rate(10);
        assert_eq!(b.dying_rate(), 10);
        b.to_death();
        b.set_dying_rate(99);
        assert_eq!(b.dying_rate(), 10);
    }

    fn exploder() -> Ball {
        let opts = BallOptions::default()
            .with_color("#000000")
            .with_explosion(Some("#ffffff"), Some(30.0), true, 10);
        Ball::new(0.0, 0.0, 10.0, &opts)
    }

    #[test]
    fn test_explosion_window() {
        let mut b = exploder();
        b.explode();
        assert!(b.is_exploding());

        for k in 1..=9 {
            b.step(0.0, 0.0);
            assert!(close(b.radius(), 10.0 + 2.0 * k as f64));
            assert!(!b.is_dead());
        }
        b.step(0.0, 0.0);
        assert_eq!(b.radius(), 30.0);
        assert_eq!(b.alpha(), 0.0);
        assert_eq!(b.color(), Rgb::WHITE);
        assert!(b.is_dead());

        b.step(0.0, 0.0);
        assert_eq!(b.radius(), 30.0);
    }

    #[test]
    fn test_explode_retrigger_resets_window() {
        let mut b = exploder();
        b.explode();
        for _ in 0..5 {
            b.step(0.0, 0.0);
        }
        assert!(close(b.radius(), 20.0));
        assert_eq!(b.lifetime(), 5.0);

        // Second call at frame 5: window [5, 15], ramp starts over
        b.explode();
        assert_eq!(b.radius(), 10.0);
        assert_eq!(b.lifetime(), 10.0);
        for k in 1..=9 {
            b.step(0.0, 0.0);
            assert!(close(b.radius(), 10.0 + 2.0 * k as f64));
            assert!(b.is_exploding() && !b.is_dead());
        }
        b.step(0.0, 0.0);
        assert_eq!(b.frame(), 15);
        assert_eq!(b.radius(), 30.0);
        assert!(b.is_dead());
    }

    #[test]
    fn test_exploded_ball_unlocks_once_dead() {
        let opts = BallOptions::default().with_explosion(None, None, true, 3);
        let mut b = Ball::new(0.0, 0.0, 10.0, &opts);
        b.explode();
        for _ in 0..20 {
            b.step(0.0, 0.0);
        }
        assert!(b.is_dead());
        assert!(!b.is_exploding());
        assert!(!b.is_bouncing());
        // Last displayed values survive death
        assert_eq!(b.radius(), 20.0);
        assert_eq!(b.alpha(), 0.0);

        b.set_color(Rgb::new(255, 0, 0)).set_radius(5.0).set_exploding_rate(7);
        assert_eq!(b.base_color(), Rgb::new(255, 0, 0));
        assert_eq!(b.base_radius(), 5.0);
        assert_eq!(b.exploding_rate(), 7);
    }

    #[test]
    fn test_explode_cancels_dying_and_resets_appearance() {
        let opts = BallOptions::default().with_bounce(Some("#ff0000"), true, 20);
        let mut b = Ball::new(0.0, 0.0, 10.0, &opts);
        b.flash();
        b.to_death();
        b.step(0.0, 0.0);
        assert!(b.radius() < 10.0);

        b.explode();
        assert!(!b.is_dying());
        assert!(!b.is_bouncing());
        assert_eq!(b.radius(), 10.0);
        assert_eq!(b.color(), b.base_color());
        assert_eq!(b.alpha(), 1.0);
        assert_eq!(b.lifetime(), 60.0);
    }

    #[test]
    fn test_setters_locked_while_exploding() {
        let mut b = exploder();
        b.explode();
        b.set_radius(50.0)
            .set_color(Rgb::new(1, 2, 3))
            .set_alpha(0.3)
            .set_exploding_rate(99)
            .set_exploding_radius(99.0)
            .set_exploding_alpha(false)
            .set_exploding_color(Rgb::BLACK);
        assert_eq!(b.base_radius(), 10.0);
        assert_eq!(b.base_color(), Rgb::BLACK);
        assert_eq!(b.base_alpha(), 1.0);
        assert_eq!(b.exploding_rate(), 10);
        assert_eq!(b.exploding_radius(), 30.0);
        assert!(b.exploding_alpha());
        assert_eq!(b.exploding_color(), Rgb::WHITE);
    }

    #[test]
    fn test_explosion_smaller_radius_does_not_grow() {
        let opts = BallOptions::default().with_explosion(None, Some(5.0), false, 10);
        let mut b = Ball::new(0.0, 0.0, 10.0, &opts);
        b.explode();
        while !b.is_dead() {
            b.step(0.0, 0.0);
            assert!(b.radius() <= 10.0);
        }
    }

    #[test]
    fn test_bounce_alpha_ramps_back() {
        let opts = BallOptions::default().with_bounce(None, true, 4);
        let mut b = Ball::new(0.0, 0.0, 10.0, &opts);
        b.flash();
        assert!(b.is_bouncing());
        assert!(close(b.alpha(), 0.2));

        let expected = [0.4, 0.6, 0.8, 1.0, 1.0];
        for want in expected {
            b.step(0.0, 0.0);
            assert!(close(b.alpha(), want), "alpha {} != {}", b.alpha(), want);
        }
        assert!(!b.is_bouncing());
        // No bounce color configured: color never moved
        assert_eq!(b.color(), b.base_color());
    }

    #[test]
    fn test_low_alpha_flashes_to_zero() {
        let opts = BallOptions { alpha: 0.1, ..Default::default() }.with_bounce(None, true, 4);
        let mut b = Ball::new(0.0, 0.0, 10.0, &opts);
        b.flash();
        assert_eq!(b.alpha(), 0.0);
    }

    #[test]
    fn test_bounce_retrigger_resets_window() {
        let opts = BallOptions::default().with_bounce(Some("#ff0000"), false, 4);
        let mut b = Ball::new(0.0, 0.0, 10.0, &opts);
        b.flash();
        b.step(0.0, 0.0).step(0.0, 0.0).step(0.0, 0.0);
        b.flash();
        assert_eq!(b.color(), Rgb::new(255, 0, 0));
        for _ in 0..4 {
            b.step(0.0, 0.0);
            assert!(b.is_bouncing());
        }
        b.step(0.0, 0.0);
        assert!(!b.is_bouncing());
        assert_eq!(b.color(), b.base_color());
    }

    fn glower() -> Ball {
        let opts = BallOptions::default()
            .with_color("#000000")
            .with_glow("#646464", 4)
            .with_blink("#ffffff", 3);
        Ball::new(0.0, 0.0, 10.0, &opts)
    }

    fn gray(v: u8) -> Rgb {
        Rgb::new(v, v, v)
    }

    #[test]
    fn test_glow_oscillates_between_colors() {
        let mut b = glower();
        b.glow();
        assert!(b.is_glowing());
        assert_eq!(b.color(), gray(25));

        let expected = [50, 75, 100, 75, 50, 25, 0, 25];
        for want in expected {
            b.step(0.0, 0.0);
            assert_eq!(b.color(), gray(want));
        }

        b.stop_glow();
        assert!(!b.is_glowing());
        assert_eq!(b.color(), gray(0));
    }

    #[test]
    fn test_blink_toggles() {
        let mut b = glower();
        b.blink();
        assert!(b.is_blinking());

        let expected = [0, 0, 255, 255, 255, 0];
        for want in expected {
            b.step(0.0, 0.0);
            assert_eq!(b.color(), gray(want));
        }
        b.stop_blink();
        assert_eq!(b.color(), gray(0));
    }

    #[test]
    fn test_glow_and_blink_are_exclusive() {
        let mut b = glower();
        b.blink();
        b.glow();
        assert!(b.is_glowing() && !b.is_blinking());
        b.blink();
        assert!(b.is_blinking() && !b.is_glowing());
    }

    #[test]
    fn test_bounce_overrides_glow_then_glow_resumes() {
        let opts = BallOptions::default()
            .with_color("#000000")
            .with_glow("#646464", 4)
            .with_bounce(Some("#ff0000"), false, 10);
        let mut b = Ball::new(0.0, 0.0, 10.0, &opts);
        b.glow();
        b.flash();
        b.step(0.0, 0.0);
        assert_eq!(b.color(), Rgb::new(230, 0, 0));
        assert!(b.is_glowing());

        for _ in 0..9 {
            b.step(0.0, 0.0);
        }
        assert_eq!(b.color(), gray(0));

        // Glow restarts rising once the flash is over
        b.step(0.0, 0.0);
        assert_eq!(b.color(), gray(25));
    }

    #[test]
    fn test_explode_overrides_flash() {
        let opts = BallOptions::default().with_bounce(Some("#ff0000"), true, 10);
        let mut b = Ball::new(0.0, 0.0, 10.0, &opts);
        b.explode();
        b.flash();
        assert!(!b.is_bouncing());
        assert_eq!(b.alpha(), 1.0);
        b.step(0.0, 0.0);
        assert_ne!(b.color(), Rgb::new(255, 0, 0));
    }

    #[test]
    fn test_glow_refused_while_exploding() {
        let mut b = glower();
        b.explode();
        b.glow();
        assert!(!b.is_glowing());
        b.blink();
        assert!(!b.is_blinking());
    }

    #[test]
    fn test_set_color_restarts_glow() {
        let mut b = glower();
        b.glow();
        b.step(0.0, 0.0).step(0.0, 0.0);
        b.set_color(gray(200));
        assert_eq!(b.base_color(), gray(200));
        // 200 -> 100 at a quarter: -25
        assert_eq!(b.color(), gray(175));
        assert!(b.is_glowing());
    }

    #[test]
    fn test_set_color_hex_ignores_invalid() {
        let mut b = plain(5.0);
        b.set_color_hex("#nothex");
        assert_eq!(b.base_color(), Rgb::BLUE);
        b.set_color_hex("#0f0");
        assert_eq!(b.color(), Rgb::new(0, 255, 0));
    }

    #[test]
    fn test_set_alpha_validates() {
        let mut b = plain(5.0);
        b.set_alpha(1.5);
        assert_eq!(b.alpha(), 1.0);
        b.set_alpha(0.4);
        assert_eq!(b.alpha(), 0.4);
        assert_eq!(b.base_alpha(), 0.4);
    }

    #[test]
    fn test_random_placement_in_bounds() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut b = plain(5.0);
        for _ in 0..100 {
            b.set_random_position_and_speed_in_bounds(&mut rng, 300.0, 200.0);
            assert!((0.0..300.0).contains(&b.x()));
            assert!((0.0..200.0).contains(&b.y()));
            assert!((0.0..10.0).contains(&b.velocity_x()));
            assert!((0.0..10.0).contains(&b.velocity_y()));
        }
    }

    #[test]
    fn test_random_placement_out_of_bounds() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut b = plain(5.0);
        for _ in 0..100 {
            b.set_random_position_and_speed_out_of_bounds(&mut rng, 300.0, 200.0, 40.0);
            assert!(b.temporary_out_of_bounds());
            match b.x() {
                x if x == -40.0 => assert!(b.velocity_x() >= 0.0),
                x if x == 340.0 => assert!(b.velocity_x() <= 0.0),
                x => panic!("unexpected x {x}"),
            }
            match b.y() {
                y if y == -40.0 => assert!(b.velocity_y() >= 0.0),
                y if y == 240.0 => assert!(b.velocity_y() <= 0.0),
                y => panic!("unexpected y {y}"),
            }
        }
    }

    #[test]
    fn test_distance_helpers() {
        let a = Ball::new(3.0, 4.0, 1.0, &BallOptions::default());
        let b = plain(1.0);
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(a.vector_to(&b), DVec2::new(3.0, 4.0));
    }

    #[test]
    fn test_serde_keeps_infinite_lifetime() {
        let b = plain(5.0);
        let json = serde_json::to_string(&b).unwrap();
        assert!(json.contains("\"lifetime\":null"));
        let back: Ball = serde_json::from_str(&json).unwrap();
        assert!(back.lifetime().is_infinite());
        assert_eq!(back.color(), b.color());
    }

    proptest! {
        #[test]
        fn prop_alpha_and_radius_stay_bounded(
            alpha in 0.0..=1.0f64,
            radius in 1.0..50.0f64,
            extra in 0.0..50.0f64,
            bounce_rate in 1u32..30,
            explode_rate in 1u32..30,
            ops in proptest::collection::vec(0u8..6, 1..200),
        ) {
            let opts = BallOptions { alpha, ..Default::default() }
                .with_bounce(Some("#ff00ff"), true, bounce_rate)
                .with_explosion(Some("#00ff00"), Some(radius + extra), true, explode_rate);
            let mut b = Ball::new(0.0, 0.0, radius, &opts);
            for op in ops {
                match op {
                    0 => { b.flash(); }
                    1 => { b.explode(); }
                    _ => { b.step(0.0, 0.0); }
                }
                prop_assert!((0.0..=1.0).contains(&b.alpha()));
                prop_assert!(b.radius() >= 0.0);
                prop_assert!(b.radius() <= radius + extra);
            }
        }

        #[test]
        fn prop_single_color_driver(ops in proptest::collection::vec(0u8..6, 1..120)) {
            let opts = BallOptions::default()
                .with_color("#000000")
                .with_glow("#646464", 5)
                .with_blink("#ffffff", 3)
                .with_bounce(Some("#ff0000"), false, 4);
            let mut b = Ball::new(0.0, 0.0, 10.0, &opts);
            for op in ops {
                match op {
                    0 => { b.glow(); }
                    1 => { b.blink(); }
                    2 => { b.flash(); }
                    _ => { b.step(0.0, 0.0); }
                }
                prop_assert!(!(b.is_glowing() && b.is_blinking()));
                let c = b.color();
                if b.is_bouncing() {
                    // Red channel only while the flash drives the color
                    prop_assert!(c.g == 0 && c.b == 0);
                } else if b.is_glowing() {
                    prop_assert!(c.r == c.g && c.g == c.b && c.r <= 100);
                } else if b.is_blinking() {
                    prop_assert!(c == Rgb::BLACK || c == Rgb::WHITE);
                }
            }
        }
    }
}
