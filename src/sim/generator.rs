//! Procedural platform field and powerup spawning
//!
//! The generator is a pure consumer of [`GenerationParams`]: it never reads
//! the difficulty engine directly. It keeps the field covered one screen
//! above the player and retires platforms that fall too far below.

use glam::Vec2;
use rand::Rng;

use super::state::{GameState, Platform, PlatformKind, Powerup, PowerupKind};
use crate::consts::*;

/// Seed the starting field: a guaranteed first hop off the ground, then a
/// column of platforms up past the top of the screen.
pub fn seed_initial_platforms(state: &mut GameState) {
    let mut y = SCREEN_HEIGHT - MAX_JUMP_HEIGHT + 20.0;
    spawn_platform(state, y);

    while y > -SCREEN_HEIGHT * 0.2 {
        let (lo, hi) = state.gen_params.spacing_range;
        y -= state.rng.random_range(lo..hi);
        spawn_platform(state, y);
    }
}

/// Smallest platform y in the field (highest altitude), infinity when empty
pub fn highest_platform_y(state: &GameState) -> f32 {
    state
        .platforms
        .iter()
        .fold(f32::INFINITY, |acc, p| acc.min(p.pos.y))
}

/// Per-tick generator pass: extend coverage upward, advance platform
/// behavior, retire dead and fallen-behind platforms.
pub fn update(state: &mut GameState, dt: f32) {
    ensure_coverage(state);

    for platform in &mut state.platforms {
        platform.update(dt);
    }

    let cutoff = state.player.pos.y + RETENTION_MARGIN;
    state.platforms.retain(|p| p.active && p.pos.y < cutoff);
}

/// Keep the field populated up to one screen above the player
fn ensure_coverage(state: &mut GameState) {
    let mut highest = highest_platform_y(state);
    if !highest.is_finite() {
        // Empty field (all platforms decayed or retired): restart the
        // column from the player's altitude
        highest = state.player.pos.y;
    }

    while highest > state.player.pos.y - SCREEN_HEIGHT {
        let (lo, hi) = state.gen_params.spacing_range;
        highest -= state.rng.random_range(lo..hi);
        spawn_platform(state, highest);
    }
}

fn spawn_platform(state: &mut GameState, y: f32) {
    let (width_lo, width_hi) = state.gen_params.width_range;
    let width = state.rng.random_range(width_lo..width_hi);
    let x = state.rng.random_range(0.0..SCREEN_WIDTH - width);
    let kind = state.gen_params.type_weights.sample(&mut state.rng);

    let velocity = match kind {
        PlatformKind::Oscillating => {
            random_direction(state) * state.rng.random_range(0.2..0.8) * MOVE_SPEED
        }
        PlatformKind::Wrapping => {
            random_direction(state) * state.rng.random_range(0.3..1.0) * MOVE_SPEED
        }
        PlatformKind::Static | PlatformKind::Decaying => 0.0,
    };

    let id = state.next_entity_id();
    state.platforms.push(Platform {
        id,
        kind,
        pos: Vec2::new(x, y),
        width,
        height: PLATFORM_HEIGHT,
        velocity,
        active: true,
        break_timer: None,
    });
}

fn random_direction(state: &mut GameState) -> f32 {
    if state.rng.random_bool(0.5) { 1.0 } else { -1.0 }
}

/// Roll a powerup spawn each time the player climbs across a screen-height
/// boundary. Only upward progress is checked; descending never re-rolls.
pub fn update_powerups(state: &mut GameState) {
    let current = state.player.pos.y;
    if current >= state.last_powerup_check {
        return;
    }

    let crossed = (current / POWERUP_INTERVAL).floor()
        != (state.last_powerup_check / POWERUP_INTERVAL).floor();
    if crossed && state.rng.random_bool(POWERUP_SPAWN_CHANCE) {
        spawn_powerup(state, current - SCREEN_HEIGHT);
    }
    state.last_powerup_check = current;
}

fn spawn_powerup(state: &mut GameState, y: f32) {
    let x = state.rng.random_range(0.0..SCREEN_WIDTH - POWERUP_SIZE);
    let kind = if state.rng.random_bool(0.5) {
        PowerupKind::Rocket
    } else {
        let (value_lo, value_hi) = MULTIPLIER_RANGE;
        let (dur_lo, dur_hi) = MULTIPLIER_DURATION_RANGE;
        PowerupKind::Multiplier {
            value: state.rng.random_range(value_lo..value_hi),
            duration: state.rng.random_range(dur_lo..dur_hi),
        }
    };

    let id = state.next_entity_id();
    log::debug!("powerup spawned: {kind:?} at ({x:.0}, {y:.0})");
    state.powerups.push(Powerup {
        id,
        kind,
        pos: Vec2::new(x, y),
        size: POWERUP_SIZE,
        collected: false,
    });
}
