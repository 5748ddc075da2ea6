//! Headless demo runner
//!
//! Drives the simulation with a simple platform-seeking bot so a run can be
//! watched through the log output without any renderer attached.
//!
//! Usage: `sky-jump [seed] [--dump]`

use sky_jump::consts::*;
use sky_jump::sim::state::SimEvent;
use sky_jump::Simulation;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut seed = 42u64;
    let mut dump = false;
    for arg in std::env::args().skip(1) {
        if arg == "--dump" {
            dump = true;
        } else if let Ok(parsed) = arg.parse() {
            seed = parsed;
        }
    }

    let mut sim = Simulation::new(seed);
    let mut last_report = 0.0f64;

    // Up to two minutes of simulated play
    let frames = (120.0 / SIM_DT as f64) as u64;
    for _ in 0..frames {
        steer(&mut sim);
        sim.tick(SIM_DT);

        for event in sim.drain_events() {
            match event {
                SimEvent::PowerupCollected { kind } => log::info!("collected {kind:?}"),
                SimEvent::MultiplierActivated { value, duration } => {
                    log::info!("multiplier x{value:.1} for {duration:.0}s")
                }
                _ => {}
            }
        }

        let now = sim.state().sim_time();
        if now - last_report >= 5.0 {
            last_report = now;
            log::info!(
                "t={:.0}s score={:.0} height={:.0}px level={}",
                now,
                sim.score(),
                sim.height(),
                sim.difficulty_level()
            );
        }

        if sim.is_dead() {
            break;
        }
    }

    log::info!(
        "final: score={:.0} height={:.0}px dead={}",
        sim.score(),
        sim.height(),
        sim.is_dead()
    );

    if dump {
        match serde_json::to_string_pretty(&sim.snapshot()) {
            Ok(json) => println!("{json}"),
            Err(err) => log::error!("snapshot dump failed: {err}"),
        }
    }
}

/// Aim at the closest platform above the player and jump whenever possible
fn steer(sim: &mut Simulation) {
    let player = &sim.state().player;
    let player_x = player.pos.x + player.width / 2.0;
    let player_y = player.pos.y;
    let grounded = player.grounded;

    let target = sim
        .platforms()
        .iter()
        .filter(|p| p.pos.y < player_y)
        .max_by(|a, b| a.pos.y.partial_cmp(&b.pos.y).unwrap_or(std::cmp::Ordering::Equal))
        .map(|p| p.pos.x + p.width / 2.0);

    if let Some(target_x) = target {
        if target_x < player_x - 10.0 {
            sim.stop_move_right();
            sim.start_move_left();
        } else if target_x > player_x + 10.0 {
            sim.stop_move_left();
            sim.start_move_right();
        } else {
            sim.stop_move_left();
            sim.stop_move_right();
        }
    }

    if grounded {
        sim.jump();
    }
}
