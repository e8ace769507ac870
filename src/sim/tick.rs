//! Simulation tick
//!
//! Advances the world by one frame deterministically: step, ball-ball
//! collisions, escape respawns, border collisions, then cleanup.

use super::collision;
use super::state::{SimEvent, Stage, World};
use crate::consts::RESPAWN_STALL_SPEED;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Added to every ball's velocity before friction
    pub dx: f64,
    pub dy: f64,
    /// Balls to explode before stepping
    pub explode: Vec<usize>,
    /// Balls to start dying before stepping
    pub to_death: Vec<usize>,
}

/// Advance the world by one frame
pub fn tick(world: &mut World, input: &TickInput) {
    world.events.clear();
    world.time_ticks += 1;
    let mut rng = world.rng_state.rng_for_tick(world.time_ticks);
    let Stage { width, height } = world.stage;

    // === Triggers ===
    for &index in &input.explode {
        match world.balls.get_mut(index) {
            Some(ball) => {
                ball.explode();
            }
            None => log::warn!("explode: no ball at index {index}"),
        }
    }
    for &index in &input.to_death {
        match world.balls.get_mut(index) {
            Some(ball) => {
                ball.to_death();
            }
            None => log::warn!("to_death: no ball at index {index}"),
        }
    }

    // === Step ===
    for (index, ball) in world.balls.iter_mut().enumerate() {
        let was_dead = ball.is_dead();
        ball.step(input.dx, input.dy);
        if !was_dead && ball.is_dead() {
            world.events.push(SimEvent::Died { index });
        }
    }

    // === Ball vs ball ===
    // Each unordered pair once, `a` always before `b`
    for i in 0..world.balls.len() {
        let (head, tail) = world.balls.split_at_mut(i + 1);
        let a = &mut head[i];
        for (offset, b) in tail.iter_mut().enumerate() {
            if a.check_collision(b) && a.resolve_collision(b) {
                world.events.push(SimEvent::BallCollision {
                    a: i,
                    b: i + 1 + offset,
                });
            }
        }
    }

    // === Escapes ===
    if world.respawn_out_of_bounds {
        let gap = world.out_of_bounds_gap;
        for (index, ball) in world.balls.iter_mut().enumerate() {
            if ball.is_dead() {
                continue;
            }
            let escaped =
                !ball.temporary_out_of_bounds() && ball.is_out_of_bounds(width, height, gap);
            // Friction can stop a waiting ball before it reaches the stage
            let stalled = ball.temporary_out_of_bounds()
                && !collision::overlaps_stage(ball, width, height)
                && ball.velocity().length() * ball.gravity().abs() < RESPAWN_STALL_SPEED;
            if !escaped && !stalled {
                continue;
            }
            ball.set_random_position_and_speed_out_of_bounds(&mut rng, width, height, gap);
            log::debug!("ball {index} respawned at ({}, {})", ball.x(), ball.y());
            world.events.push(SimEvent::Respawned { index });
        }
    }

    // === Borders ===
    for (index, ball) in world.balls.iter_mut().enumerate() {
        if ball.temporary_out_of_bounds() {
            // Borders apply from the tick after the ball first reaches the stage
            if collision::overlaps_stage(ball, width, height) {
                ball.set_temporary_out_of_bounds(false);
            }
            continue;
        }
        if ball.resolve_border_collision(width, height) {
            world.events.push(SimEvent::BorderCollision { index });
        }
    }

    // === Cleanup ===
    if world.remove_dead {
        world.balls.retain(|b| !b.is_dead());
    }
}
