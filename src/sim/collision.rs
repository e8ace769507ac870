//! Collision detection and response
//!
//! Ball vs ball: brute-force circle overlap test plus an impulse along the
//! center line, damped by each ball's own elasticity. Overlapping balls are
//! not pushed apart. Ball vs stage: reflect and clamp against each border
//! independently.

use super::ball::Ball;
use super::vector::{minimum_translation, separation};
use crate::consts::RESTITUTION;

/// Which stage borders a ball crossed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BorderHits {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl BorderHits {
    pub fn any(&self) -> bool {
        self.left || self.right || self.top || self.bottom
    }
}

/// True if the circles touch or overlap (symmetric)
#[inline]
pub fn check_collision(a: &Ball, b: &Ball) -> bool {
    let sum_radius = a.radius + b.radius;
    a.pos.distance_squared(b.pos) <= sum_radius * sum_radius
}

/// Exchange momentum between two colliding balls
///
/// Returns false without touching either ball when the centers coincide,
/// when the balls are already separating, or when either ball is dead.
/// On success both balls get their bounce flash.
pub fn resolve_collision(a: &mut Ball, b: &mut Ball) -> bool {
    if a.is_dead() || b.is_dead() {
        return false;
    }

    let Some((delta, d)) = separation(a.pos, b.pos) else {
        return false;
    };

    // Touching circles have a zero-length mtd; the center line is the limit
    let mtd = minimum_translation(delta, d, a.radius + b.radius);
    let normal = mtd.try_normalize().unwrap_or(delta / d);

    let im1 = 1.0 / a.mass;
    let im2 = 1.0 / b.mass;

    let vn = (a.vel - b.vel).dot(normal);
    // Intersecting but already moving apart
    if vn > 0.0 {
        return false;
    }

    let i = -(1.0 + RESTITUTION) * vn / (im1 + im2);
    let impulse = normal * i;

    a.vel = (a.vel + impulse * im1) * a.elasticity;
    b.vel = (b.vel - impulse * im2) * b.elasticity;

    a.flash();
    b.flash();
    true
}

/// Reflect off and clamp to every border the ball crosses
///
/// Border hits do not trigger the bounce flash; callers that want feedback
/// can act on the returned hits. Dead balls are left untouched.
pub fn resolve_border_collision(
    ball: &mut Ball,
    stage_width: f64,
    stage_height: f64,
) -> BorderHits {
    let mut hits = BorderHits::default();
    if ball.is_dead() {
        return hits;
    }

    let r = ball.radius;
    let e = ball.elasticity;

    if ball.pos.x - r < 0.0 {
        ball.vel.x = -ball.vel.x * e;
        ball.pos.x = r;
        hits.left = true;
    }
    if ball.pos.x + r > stage_width {
        ball.vel.x = -ball.vel.x * e;
        ball.pos.x = stage_width - r;
        hits.right = true;
    }
    if ball.pos.y - r < 0.0 {
        ball.vel.y = -ball.vel.y * e;
        ball.pos.y = r;
        hits.top = true;
    }
    if ball.pos.y + r > stage_height {
        ball.vel.y = -ball.vel.y * e;
        ball.pos.y = stage_height - r;
        hits.bottom = true;
    }

    hits
}

/// True if the ball's extent is more than `gap` outside the stage
pub fn is_out_of_bounds(ball: &Ball, stage_width: f64, stage_height: f64, gap: f64) -> bool {
    let r = ball.radius;
    ball.pos.x - r < -gap
        || ball.pos.x + r > stage_width + gap
        || ball.pos.y - r < -gap
        || ball.pos.y + r > stage_height + gap
}

/// True if any part of the ball's extent is over the stage
pub fn overlaps_stage(ball: &Ball, stage_width: f64, stage_height: f64) -> bool {
    let r = ball.radius;
    ball.pos.x + r > 0.0
        && ball.pos.x - r < stage_width
        && ball.pos.y + r > 0.0
        && ball.pos.y - r < stage_height
}
