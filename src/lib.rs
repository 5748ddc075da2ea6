//! Sky Jump - simulation core for an infinite vertical platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, generation, scoring)
//!
//! Rendering, persistence I/O, menus and key bindings are external
//! collaborators: they read the snapshot accessors on [`sim::Simulation`]
//! between tick batches and never mutate simulation state.

pub mod sim;

pub use sim::{GameState, Simulation};

/// Game configuration constants
///
/// World units are pixels, y grows downward, the ground sits at
/// `SCREEN_HEIGHT`.
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per driver invocation to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// World dimensions
    pub const SCREEN_WIDTH: f32 = 400.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;

    /// Player extents
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;

    /// Horizontal movement speed (px/s)
    pub const MOVE_SPEED: f32 = 300.0;
    /// Jump impulse (px/s, negative is up)
    pub const JUMP_FORCE: f32 = -350.0;
    /// Gravity increment applied once per fixed step, not dt-scaled
    /// (tuned for the 60 Hz step)
    pub const GRAVITY: f32 = 10.0;

    /// Apex height of a full jump. Gravity is a per-step increment, so the
    /// apex works out to v0^2 * dt / (2 * g).
    pub const MAX_JUMP_HEIGHT: f32 =
        (JUMP_FORCE * SIM_DT) * (JUMP_FORCE * SIM_DT) / (2.0 * GRAVITY * SIM_DT);

    /// Platform slab thickness
    pub const PLATFORM_HEIGHT: f32 = 10.0;
    /// Landing tolerance band below a platform top (px)
    pub const LANDING_TOLERANCE: f32 = 10.0;
    /// Seconds a Decaying platform survives after the first landing
    pub const BREAK_DELAY: f32 = 0.1;

    /// Entities this far below the player can never be revisited
    pub const RETENTION_MARGIN: f32 = 300.0;
    /// Falling this far past the lowest live platform is fatal
    pub const DEATH_MARGIN: f32 = 50.0;

    /// Camera smoothing factor per tick
    pub const CAMERA_LERP: f32 = 0.1;
    /// Player rest position as a fraction of screen height from the bottom
    pub const SCREEN_BOTTOM: f32 = 0.2;

    /// Altitude per score point (px)
    pub const SCORE_THRESHOLD: f32 = 100.0;
    /// Score points per timed-boost reward
    pub const BOOST_THRESHOLD: f32 = 10.0;
    /// Timed-boost duration range (seconds)
    pub const BOOST_DURATION_RANGE: (f64, f64) = (25.0, 45.0);

    /// Powerup square size (px)
    pub const POWERUP_SIZE: f32 = 30.0;
    /// Bernoulli spawn chance per interval crossed
    pub const POWERUP_SPAWN_CHANCE: f64 = 0.3;
    /// Altitude interval between powerup spawn rolls
    pub const POWERUP_INTERVAL: f32 = SCREEN_HEIGHT;
    /// Multiplier powerup value range
    pub const MULTIPLIER_RANGE: (f32, f32) = (1.5, 3.0);
    /// Multiplier powerup duration range (seconds)
    pub const MULTIPLIER_DURATION_RANGE: (f64, f64) = (10.0, 20.0);

    /// Score points per difficulty level
    pub const DIFFICULTY_THRESHOLD: f32 = 10.0;
    /// Factor step per level transition
    pub const FACTOR_INCREMENT: f32 = 0.2;
    pub const MAX_DIFFICULTY_FACTOR: f32 = 1.0;
    pub const MAX_DIFFICULTY_LEVEL: u32 = 5;
}
