//! Entity types and the simulation aggregate
//!
//! All state that must be persisted for save/load and determinism lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::difficulty::{DifficultyState, GenerationParams};
use super::generator;
use super::score::{BoostKind, ScoreState};
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Normal tick processing
    Running,
    /// The player fell below the platform field. Terminal: no further
    /// physics steps run until reset or restore.
    Dead,
}

/// Multiplicative boost factors scoped to one body, never global state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoostFactors {
    pub speed: f32,
    pub jump: f32,
    pub gravity: f32,
}

impl Default for BoostFactors {
    fn default() -> Self {
        Self { speed: 1.0, jump: 1.0, gravity: 1.0 }
    }
}

impl BoostFactors {
    pub fn get(&self, kind: BoostKind) -> f32 {
        match kind {
            BoostKind::Speed => self.speed,
            BoostKind::Jump => self.jump,
            BoostKind::Gravity => self.gravity,
        }
    }

    pub fn set(&mut self, kind: BoostKind, value: f32) {
        match kind {
            BoostKind::Speed => self.speed = value,
            BoostKind::Jump => self.jump = value,
            BoostKind::Gravity => self.gravity = value,
        }
    }
}

/// The controllable body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner, world units
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    pub jumping: bool,
    /// Recomputed every step by the ground clamp and the landing resolver
    pub grounded: bool,
    pub moving_left: bool,
    pub moving_right: bool,
    /// Cheat toggle: allows one extra mid-air jump
    pub double_jump_enabled: bool,
    pub second_jump_used: bool,
    pub boost_factors: BoostFactors,
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(
                (SCREEN_WIDTH - PLAYER_WIDTH) / 2.0,
                SCREEN_HEIGHT - PLAYER_HEIGHT,
            ),
            vel: Vec2::ZERO,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            jumping: false,
            grounded: true,
            moving_left: false,
            moving_right: false,
            double_jump_enabled: false,
            second_jump_used: false,
            boost_factors: BoostFactors::default(),
        }
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    pub fn start_move_left(&mut self) {
        self.moving_left = true;
        self.vel.x = -MOVE_SPEED * self.boost_factors.speed;
    }

    /// Releasing one direction resumes movement in the other if it is
    /// still held
    pub fn stop_move_left(&mut self) {
        self.moving_left = false;
        self.refresh_horizontal_velocity();
    }

    pub fn start_move_right(&mut self) {
        self.moving_right = true;
        self.vel.x = MOVE_SPEED * self.boost_factors.speed;
    }

    pub fn stop_move_right(&mut self) {
        self.moving_right = false;
        self.refresh_horizontal_velocity();
    }

    fn refresh_horizontal_velocity(&mut self) {
        let speed = MOVE_SPEED * self.boost_factors.speed;
        self.vel.x = match (self.moving_left, self.moving_right) {
            (true, false) => -speed,
            (false, true) => speed,
            // Both held: keep the current heading at the refreshed speed
            (true, true) => {
                if self.vel.x < 0.0 {
                    -speed
                } else {
                    speed
                }
            }
            (false, false) => 0.0,
        };
    }

    pub fn activate_double_jump(&mut self) {
        self.double_jump_enabled = true;
    }

    /// Ground jump, or the one extra mid-air jump when the cheat is on
    pub fn jump(&mut self) {
        if !self.jumping {
            self.vel.y = JUMP_FORCE * self.boost_factors.jump;
            self.jumping = true;
            self.second_jump_used = false;
        } else if self.double_jump_enabled && !self.second_jump_used {
            self.vel.y = JUMP_FORCE * self.boost_factors.jump;
            self.second_jump_used = true;
        }
    }

    /// Set one boost factor; a speed change retunes the held-key velocity
    pub fn set_boost_factor(&mut self, kind: BoostKind, value: f32) {
        self.boost_factors.set(kind, value);
        if kind == BoostKind::Speed {
            self.refresh_horizontal_velocity();
        }
    }

    /// Advance one fixed step: gravity, integration, ground clamp,
    /// horizontal wrap
    pub fn integrate(&mut self, dt: f32) {
        self.grounded = false;

        self.vel.y += GRAVITY * self.boost_factors.gravity;

        // Falling means airborne: blocks re-jump after walking off a ledge
        if self.vel.y > 0.0 {
            self.jumping = true;
        }

        self.pos += self.vel * dt;

        let ground_y = SCREEN_HEIGHT - self.height;
        if self.pos.y >= ground_y {
            self.pos.y = ground_y;
            self.vel.y = 0.0;
            self.jumping = false;
            self.grounded = true;
        }

        // Toroidal horizontal wrap once fully off an edge
        if self.right() < 0.0 {
            self.pos.x = SCREEN_WIDTH;
        } else if self.pos.x > SCREEN_WIDTH {
            self.pos.x = -self.width;
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// Platform behavior variants (closed set, matched exhaustively)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformKind {
    Static,
    /// Bounces between the screen edges
    Oscillating,
    /// Wraps around the screen edges
    Wrapping,
    /// Breaks shortly after the first landing
    Decaying,
}

/// A platform the player can land on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    pub kind: PlatformKind,
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Horizontal velocity; zero for Static/Decaying
    pub velocity: f32,
    /// Inactive platforms are never collided with and get retired
    pub active: bool,
    /// Decaying countdown; absent until the first valid landing
    pub break_timer: Option<f32>,
}

impl Platform {
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    /// Advance kind-specific per-step behavior
    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        match self.kind {
            PlatformKind::Static => {}
            PlatformKind::Decaying => {
                if let Some(timer) = &mut self.break_timer {
                    *timer -= dt;
                    if *timer <= 0.0 {
                        self.active = false;
                    }
                }
            }
            PlatformKind::Oscillating => {
                let old_x = self.pos.x;
                self.pos.x += self.velocity * dt;
                if self.right() >= SCREEN_WIDTH || self.pos.x <= 0.0 {
                    self.velocity = -self.velocity;
                    self.pos.x = old_x;
                }
            }
            PlatformKind::Wrapping => {
                self.pos.x += self.velocity * dt;
                if self.right() < 0.0 {
                    self.pos.x = SCREEN_WIDTH;
                } else if self.pos.x > SCREEN_WIDTH {
                    self.pos.x = -self.width;
                }
            }
        }
    }

    /// Start the decay countdown on the first landing
    pub fn touch(&mut self) {
        if self.kind == PlatformKind::Decaying && self.break_timer.is_none() {
            self.break_timer = Some(BREAK_DELAY);
        }
    }
}

/// Powerup variants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PowerupKind {
    /// Direct upward impulse on pickup
    Rocket,
    /// Temporary score multiplier
    Multiplier { value: f32, duration: f64 },
}

/// A collectible powerup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Powerup {
    pub id: u32,
    pub kind: PowerupKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    pub collected: bool,
}

/// Typed events drained by external observers after a tick batch.
///
/// Replaces per-category callback registries with one closed enum: the
/// Difficulty->Generator and Score->Body notifications happen inside the
/// tick, and this queue is the outward-facing record of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    LevelUp { level: u32, factor: f32 },
    ParamsUpdated(GenerationParams),
    BoostGranted { kind: BoostKind, multiplier: f32, duration: f64 },
    BoostExpired { kind: BoostKind },
    PowerupCollected { kind: PowerupKind },
    MultiplierActivated { value: f32, duration: f64 },
    Death,
}

/// Complete simulation state (deterministic, serializable)
///
/// Owned by the update driver; one writer per tick, no concurrent mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Live RNG stream, serialized so restored games replay identically
    pub rng: Pcg32,
    /// Simulation tick counter; sim time is `time_ticks * SIM_DT`
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub powerups: Vec<Powerup>,
    pub camera: Camera,
    pub score: ScoreState,
    pub difficulty: DifficultyState,
    /// Parameters currently in force at the generator; updated only by an
    /// explicit push from the difficulty engine
    pub gen_params: GenerationParams,
    /// Altitude of the last powerup spawn-roll check
    pub last_powerup_check: f32,
    /// Pending events for external observers (not part of saved state)
    #[serde(skip)]
    pub events: Vec<SimEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh run with the initial platform field seeded
    pub fn new(seed: u64) -> Self {
        let difficulty = DifficultyState::new();
        let gen_params = difficulty.params();
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            phase: GamePhase::Running,
            player: Player::new(),
            platforms: Vec::new(),
            powerups: Vec::new(),
            camera: Camera::new(),
            score: ScoreState::new(),
            difficulty,
            gen_params,
            last_powerup_check: POWERUP_INTERVAL,
            events: Vec::new(),
            next_id: 1,
        };
        generator::seed_initial_platforms(&mut state);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Seconds of simulated time since the run started
    pub fn sim_time(&self) -> f64 {
        self.time_ticks as f64 * SIM_DT as f64
    }

    pub fn push_event(&mut self, event: SimEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_jump_and_clamp() {
        let mut player = Player::new();
        assert!(player.grounded);

        player.jump();
        assert!(player.jumping);
        assert_eq!(player.vel.y, JUMP_FORCE);

        // Run until back on the ground
        for _ in 0..600 {
            player.integrate(SIM_DT);
        }
        assert!(player.grounded);
        assert_eq!(player.vel.y, 0.0);
        assert_eq!(player.pos.y, SCREEN_HEIGHT - PLAYER_HEIGHT);
        assert!(!player.jumping);
    }

    #[test]
    fn test_falling_blocks_rejump() {
        let mut player = Player::new();
        player.pos.y = 300.0;
        player.vel.y = 50.0; // already falling
        player.integrate(SIM_DT);
        assert!(player.jumping);

        let vy = player.vel.y;
        player.jump(); // no cheat: must be a no-op
        assert_eq!(player.vel.y, vy);
    }

    #[test]
    fn test_double_jump_cheat() {
        let mut player = Player::new();
        player.activate_double_jump();

        player.jump();
        // Let it start falling
        for _ in 0..40 {
            player.integrate(SIM_DT);
        }
        assert!(player.vel.y > 0.0);

        player.jump();
        assert_eq!(player.vel.y, JUMP_FORCE);
        assert!(player.second_jump_used);

        // Third jump mid-air is rejected
        for _ in 0..5 {
            player.integrate(SIM_DT);
        }
        let vy = player.vel.y;
        player.jump();
        assert_eq!(player.vel.y, vy);
    }

    #[test]
    fn test_movement_resume_policy() {
        let mut player = Player::new();

        player.start_move_left();
        player.start_move_right();
        assert_eq!(player.vel.x, MOVE_SPEED);

        // Releasing right resumes leftward movement
        player.stop_move_right();
        assert_eq!(player.vel.x, -MOVE_SPEED);

        player.stop_move_left();
        assert_eq!(player.vel.x, 0.0);
    }

    #[test]
    fn test_speed_boost_retunes_held_velocity() {
        let mut player = Player::new();
        player.start_move_right();
        player.set_boost_factor(BoostKind::Speed, 1.2);
        assert!((player.vel.x - MOVE_SPEED * 1.2).abs() < 1e-3);

        player.set_boost_factor(BoostKind::Speed, 1.0);
        assert!((player.vel.x - MOVE_SPEED).abs() < 1e-3);
    }

    #[test]
    fn test_horizontal_wrap() {
        let mut player = Player::new();
        player.pos.x = -player.width - 1.0;
        player.integrate(SIM_DT);
        assert_eq!(player.pos.x, SCREEN_WIDTH);

        player.pos.x = SCREEN_WIDTH + 1.0;
        player.vel.x = 0.0;
        player.integrate(SIM_DT);
        assert_eq!(player.pos.x, -player.width);
    }

    #[test]
    fn test_oscillating_platform_bounces() {
        let mut platform = Platform {
            id: 1,
            kind: PlatformKind::Oscillating,
            pos: Vec2::new(SCREEN_WIDTH - 61.0, 400.0),
            width: 60.0,
            height: PLATFORM_HEIGHT,
            velocity: 120.0,
            active: true,
            break_timer: None,
        };
        for _ in 0..10 {
            platform.update(SIM_DT);
        }
        assert!(platform.velocity < 0.0);
        assert!(platform.right() <= SCREEN_WIDTH);
    }

    #[test]
    fn test_decaying_platform_counts_down() {
        let mut platform = Platform {
            id: 1,
            kind: PlatformKind::Decaying,
            pos: Vec2::new(100.0, 400.0),
            width: 60.0,
            height: PLATFORM_HEIGHT,
            velocity: 0.0,
            active: true,
            break_timer: None,
        };

        // Untouched: never decays
        for _ in 0..120 {
            platform.update(SIM_DT);
        }
        assert!(platform.active);

        platform.touch();
        assert_eq!(platform.break_timer, Some(BREAK_DELAY));
        for _ in 0..12 {
            platform.update(SIM_DT);
        }
        assert!(!platform.active);
    }
}
