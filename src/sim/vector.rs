//! 2D vector math for the collision resolver
//!
//! Vectors are glam `DVec2` values: `length`, `dot`, `try_normalize`,
//! scaling by `* k`, `+`, `-` and inversion by unary `-`. Normalizing a
//! zero-length vector must go through `try_normalize`.

use glam::DVec2;

pub type Vector2D = DVec2;

/// Vector from `b` to `a` and its length, `None` if the points coincide
#[inline]
pub fn separation(a: Vector2D, b: Vector2D) -> Option<(Vector2D, f64)> {
    let delta = a - b;
    let d = delta.length();
    if d == 0.0 || !d.is_finite() {
        return None;
    }
    Some((delta, d))
}

/// Minimum translation vector that would separate two overlapping circles
///
/// `delta` points from the second circle to the first and `d` is its
/// length (non-zero). The result is zero when the circles just touch and
/// points back along `-delta` when they don't overlap at all.
#[inline]
pub fn minimum_translation(delta: Vector2D, d: f64, sum_radii: f64) -> Vector2D {
    delta * ((sum_radii - d) / d)
}
