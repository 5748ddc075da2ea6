//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, owned by the state
//! - Sim-clock time only (no wall clock)
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod difficulty;
pub mod generator;
pub mod score;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use collision::{platform_landing, powerup_overlap, resolve_landings};
pub use difficulty::{DifficultyState, GenerationParams, TypeWeights};
pub use score::{Boost, BoostKind, ScoreState};
pub use snapshot::RestoreError;
pub use state::{
    GamePhase, GameState, Platform, PlatformKind, Player, Powerup, PowerupKind, SimEvent,
};
pub use tick::{Simulation, step};
