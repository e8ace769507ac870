//! Per-ball render data
//!
//! The simulation runs in `f64`; renderers want packed `f32` instances they
//! can copy straight into a vertex or storage buffer.

use bytemuck::{Pod, Zeroable};

use crate::sim::Ball;

/// One ball as a renderer sees it
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BallInstance {
    pub center: [f32; 2],
    pub radius: f32,
    /// Displayed color with the displayed alpha
    pub color: [f32; 4],
}

impl BallInstance {
    pub const fn new(x: f32, y: f32, radius: f32, color: [f32; 4]) -> Self {
        Self {
            center: [x, y],
            radius,
            color,
        }
    }

    /// Raw bytes of a slice of instances
    pub fn as_bytes(instances: &[BallInstance]) -> &[u8] {
        bytemuck::cast_slice(instances)
    }
}

impl From<&Ball> for BallInstance {
    fn from(ball: &Ball) -> Self {
        Self::new(
            ball.x() as f32,
            ball.y() as f32,
            ball.radius() as f32,
            ball.color().to_rgba_f32(ball.alpha()),
        )
    }
}
