//! Ball Sim entry point
//!
//! Runs the simulation headlessly: `ball-sim [settings.json] [ticks]`.
//! Set `RUST_LOG=debug` to see lifecycle transitions.

use ball_sim::Settings;
use ball_sim::sim::{SimEvent, TickInput, World, tick};

const DEFAULT_TICKS: u64 = 600;
/// Balls listed in the final summary
const SUMMARY_BALLS: usize = 5;

#[derive(Debug, Default)]
struct RunStats {
    ball_collisions: usize,
    border_collisions: usize,
    deaths: usize,
    respawns: usize,
}

impl RunStats {
    fn record(&mut self, events: &[SimEvent]) {
        for event in events {
            match event {
                SimEvent::BallCollision { .. } => self.ball_collisions += 1,
                SimEvent::BorderCollision { .. } => self.border_collisions += 1,
                SimEvent::Died { .. } => self.deaths += 1,
                SimEvent::Respawned { .. } => self.respawns += 1,
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    let ticks = match args.next().map(|arg| arg.parse::<u64>()) {
        Some(Ok(ticks)) => ticks,
        Some(Err(err)) => {
            log::warn!("Invalid tick count: {err}, running {DEFAULT_TICKS}");
            DEFAULT_TICKS
        }
        None => DEFAULT_TICKS,
    };

    log::info!(
        "Ball Sim starting: {} balls, {}x{} stage, preset {}, {} ticks",
        settings.ball_count,
        settings.stage_width,
        settings.stage_height,
        settings.preset.as_str(),
        ticks
    );

    let mut world = World::new(&settings);
    world.scatter_in_bounds();

    let input = TickInput::default();
    let mut stats = RunStats::default();
    for _ in 0..ticks {
        tick(&mut world, &input);
        stats.record(&world.events);
    }

    log::info!(
        "Finished after {} ticks: {} ball hits, {} border hits, {} deaths, {} respawns",
        world.time_ticks,
        stats.ball_collisions,
        stats.border_collisions,
        stats.deaths,
        stats.respawns
    );
    log::info!("{} of {} balls alive", world.alive_count(), world.len());

    for (index, ball) in world.balls.iter().take(SUMMARY_BALLS).enumerate() {
        println!(
            "ball {index}: pos ({:.2}, {:.2}) vel ({:.2}, {:.2}) r {:.2} {} a {:.2}{}",
            ball.x(),
            ball.y(),
            ball.velocity_x(),
            ball.velocity_y(),
            ball.radius(),
            ball.color(),
            ball.alpha(),
            if ball.is_dead() { " (dead)" } else { "" }
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host on wasm; nothing to run here
}
