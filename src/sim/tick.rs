//! Fixed-timestep update driver
//!
//! [`step`] advances the world exactly one `SIM_DT`. [`Simulation`] wraps it
//! with the accumulator loop, pause handling, input intents, and
//! snapshot/restore. All randomness flows through the seeded RNG in
//! [`GameState`], so equal seeds and equal intent sequences give equal runs.

use super::collision;
use super::generator;
use super::score::BoostChange;
use super::snapshot::{self, RestoreError};
use super::state::{GamePhase, GameState, Platform, Powerup, PowerupKind, SimEvent};
use crate::consts::*;

/// Advance the simulation one fixed step
pub fn step(state: &mut GameState, dt: f32) {
    if state.phase == GamePhase::Dead {
        return;
    }

    state.time_ticks += 1;
    let now = state.sim_time();

    state.player.integrate(dt);
    state.camera.follow(state.player.pos.y);

    apply_score(state, now);

    if let Some(params) = state.difficulty.update(state.score.score) {
        log::info!(
            "difficulty level {} (factor {:.1})",
            state.difficulty.level,
            state.difficulty.factor
        );
        state.gen_params = params.clone();
        state.push_event(SimEvent::LevelUp {
            level: state.difficulty.level,
            factor: state.difficulty.factor,
        });
        state.push_event(SimEvent::ParamsUpdated(params));
    }

    // A wiped field regenerates from the player's own altitude, so the
    // refilled platforms say nothing about how far the player has fallen.
    // Death resumes next step against real geometry.
    let field_wiped = state.platforms.is_empty();

    generator::update(state, dt);
    generator::update_powerups(state);
    collect_powerups(state, now);

    collision::resolve_landings(&mut state.player, &mut state.platforms, dt);

    if !field_wiped {
        check_death(state);
    }
}

/// Advance the score engine and apply boost grants/expiries to the body
fn apply_score(state: &mut GameState, now: f64) {
    let bottom = state.player.bottom();
    let changes = state.score.update(bottom, now, &mut state.rng);
    for change in changes {
        match change {
            BoostChange::Granted(boost) => {
                log::debug!(
                    "boost granted: {:?} x{:.1} for {:.0}s",
                    boost.kind,
                    boost.multiplier,
                    boost.duration
                );
                state.player.set_boost_factor(boost.kind, boost.multiplier);
                state.push_event(SimEvent::BoostGranted {
                    kind: boost.kind,
                    multiplier: boost.multiplier,
                    duration: boost.duration,
                });
            }
            BoostChange::Expired(kind) => {
                state.player.set_boost_factor(kind, 1.0);
                state.push_event(SimEvent::BoostExpired { kind });
            }
        }
    }
}

/// Pick up overlapped powerups and retire collected or fallen-behind ones
fn collect_powerups(state: &mut GameState, now: f64) {
    let mut powerups = std::mem::take(&mut state.powerups);
    for powerup in &mut powerups {
        if powerup.collected || !collision::powerup_overlap(&state.player, powerup) {
            continue;
        }
        powerup.collected = true;
        log::debug!("powerup collected: {:?}", powerup.kind);

        match powerup.kind {
            PowerupKind::Rocket => {
                let jump = state.player.boost_factors.jump;
                state.player.vel.y = 2.0 * JUMP_FORCE * jump;
                state.player.jumping = true;
            }
            PowerupKind::Multiplier { value, duration } => {
                state.score.activate_multiplier(value, duration, now);
                state.push_event(SimEvent::MultiplierActivated { value, duration });
            }
        }
        state.push_event(SimEvent::PowerupCollected { kind: powerup.kind });
    }

    let cutoff = state.player.pos.y + RETENTION_MARGIN;
    powerups.retain(|p| !p.collected && p.pos.y < cutoff);
    state.powerups = powerups;
}

/// Terminal check: airborne and fallen past the lowest surviving platform
fn check_death(state: &mut GameState) {
    let lowest = state
        .platforms
        .iter()
        .fold(f32::NEG_INFINITY, |acc, p| acc.max(p.pos.y));
    // Retention can empty the field mid-step; never compare against the
    // infinite sentinel
    if !lowest.is_finite() {
        return;
    }

    if !state.player.grounded && state.player.pos.y > lowest + DEATH_MARGIN {
        state.phase = GamePhase::Dead;
        state.push_event(SimEvent::Death);
        log::info!(
            "run over: score {:.0}, height {:.0}px, {:.1}s",
            state.score.score,
            state.score.height(),
            state.sim_time()
        );
    }
}

/// Owns the [`GameState`] and drives it at a fixed rate from variable
/// frame times
#[derive(Debug)]
pub struct Simulation {
    state: GameState,
    accumulator: f32,
    paused: bool,
}

impl Simulation {
    pub fn new(seed: u64) -> Self {
        log::info!("new run, seed {seed}");
        Self {
            state: GameState::new(seed),
            accumulator: 0.0,
            paused: false,
        }
    }

    /// Feed one frame's elapsed wall time; runs zero or more fixed steps.
    /// Long stalls are clamped so the world never teleports.
    pub fn tick(&mut self, elapsed: f32) {
        if self.paused {
            return;
        }
        self.accumulator += elapsed.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            step(&mut self.state, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    /// Pause drops any partial-step remainder so resuming never replays it
    pub fn pause(&mut self) {
        self.paused = true;
        self.accumulator = 0.0;
    }

    pub fn resume(&mut self) {
        self.paused = false;
        self.accumulator = 0.0;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Fresh run with the same seed
    pub fn reset(&mut self) {
        self.state = GameState::new(self.state.seed);
        self.accumulator = 0.0;
    }

    /// Serializable copy of the full state
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    /// Replace the state with a validated snapshot
    pub fn restore(&mut self, snapshot: GameState) -> Result<(), RestoreError> {
        snapshot::validate(&snapshot)?;
        self.state = snapshot;
        self.accumulator = 0.0;
        Ok(())
    }

    // Input intents, applied between steps

    pub fn start_move_left(&mut self) {
        self.state.player.start_move_left();
    }

    pub fn stop_move_left(&mut self) {
        self.state.player.stop_move_left();
    }

    pub fn start_move_right(&mut self) {
        self.state.player.start_move_right();
    }

    pub fn stop_move_right(&mut self) {
        self.state.player.stop_move_right();
    }

    pub fn jump(&mut self) {
        self.state.player.jump();
    }

    pub fn activate_double_jump(&mut self) {
        self.state.player.activate_double_jump();
    }

    // Read accessors

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_dead(&self) -> bool {
        self.state.phase == GamePhase::Dead
    }

    pub fn score(&self) -> f32 {
        self.state.score.score
    }

    pub fn height(&self) -> f32 {
        self.state.score.height()
    }

    pub fn multiplier(&self) -> f32 {
        self.state.score.multiplier
    }

    pub fn camera_y(&self) -> f32 {
        self.state.camera.y
    }

    pub fn difficulty_level(&self) -> u32 {
        self.state.difficulty.level
    }

    pub fn difficulty_factor(&self) -> f32 {
        self.state.difficulty.factor
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.state.platforms
    }

    pub fn powerups(&self) -> &[Powerup] {
        &self.state.powerups
    }

    pub fn active_boosts(&self) -> &[super::score::Boost] {
        &self.state.score.active_boosts
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.state.events)
    }
}
