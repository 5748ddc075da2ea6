//! Snapshot validation for save/load
//!
//! A snapshot is just a serialized [`GameState`]; restoring one from disk
//! must not be able to poison the simulation with NaNs or impossible
//! values, so everything numeric is checked before the swap.

use thiserror::Error;

use super::state::{GameState, PowerupKind};
use crate::consts::*;

#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("non-finite value in {what}")]
    NonFinite { what: &'static str },
    #[error("platform width {0} out of range")]
    BadPlatformWidth(f32),
    #[error("negative duration in {what}")]
    NegativeDuration { what: &'static str },
    #[error("multiplier {0} out of range")]
    BadMultiplier(f32),
    #[error("negative score {0}")]
    NegativeScore(f32),
    #[error("difficulty factor {0} out of range")]
    BadDifficultyFactor(f32),
}

fn finite(value: f32, what: &'static str) -> Result<(), RestoreError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RestoreError::NonFinite { what })
    }
}

/// Check a snapshot before it replaces the live state
pub fn validate(state: &GameState) -> Result<(), RestoreError> {
    finite(state.player.pos.x, "player position")?;
    finite(state.player.pos.y, "player position")?;
    finite(state.player.vel.x, "player velocity")?;
    finite(state.player.vel.y, "player velocity")?;

    if state.score.score < 0.0 || !state.score.score.is_finite() {
        return Err(RestoreError::NegativeScore(state.score.score));
    }
    if state.score.multiplier <= 0.0 || !state.score.multiplier.is_finite() {
        return Err(RestoreError::BadMultiplier(state.score.multiplier));
    }
    if let Some(ends_at) = state.score.multiplier_ends_at {
        if !ends_at.is_finite() || ends_at < 0.0 {
            return Err(RestoreError::NegativeDuration { what: "multiplier expiry" });
        }
    }

    let factor = state.difficulty.factor;
    if !(0.0..=MAX_DIFFICULTY_FACTOR).contains(&factor) {
        return Err(RestoreError::BadDifficultyFactor(factor));
    }

    for platform in &state.platforms {
        finite(platform.pos.x, "platform position")?;
        finite(platform.pos.y, "platform position")?;
        if !platform.width.is_finite() || platform.width <= 0.0 {
            return Err(RestoreError::BadPlatformWidth(platform.width));
        }
        if let Some(timer) = platform.break_timer {
            if timer < 0.0 {
                return Err(RestoreError::NegativeDuration { what: "break timer" });
            }
        }
    }

    for powerup in &state.powerups {
        finite(powerup.pos.x, "powerup position")?;
        finite(powerup.pos.y, "powerup position")?;
        if let PowerupKind::Multiplier { value, duration } = powerup.kind {
            if !value.is_finite() || value <= 0.0 {
                return Err(RestoreError::BadMultiplier(value));
            }
            if !duration.is_finite() || duration < 0.0 {
                return Err(RestoreError::NegativeDuration { what: "multiplier powerup" });
            }
        }
    }

    // NaN here would make expiry comparisons false forever, so finiteness
    // is part of validity
    for boost in &state.score.active_boosts {
        if !boost.duration.is_finite() || boost.duration < 0.0 {
            return Err(RestoreError::NegativeDuration { what: "boost" });
        }
        if !boost.multiplier.is_finite() || boost.multiplier <= 0.0 {
            return Err(RestoreError::BadMultiplier(boost.multiplier));
        }
        if !boost.started_at.is_finite() {
            return Err(RestoreError::NonFinite { what: "boost start time" });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state_validates() {
        let state = GameState::new(1);
        assert!(validate(&state).is_ok());
    }

    #[test]
    fn test_nan_position_rejected() {
        let mut state = GameState::new(1);
        state.player.pos.y = f32::NAN;
        assert!(matches!(
            validate(&state),
            Err(RestoreError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_bad_platform_width_rejected() {
        let mut state = GameState::new(1);
        state.platforms[0].width = -4.0;
        assert!(matches!(
            validate(&state),
            Err(RestoreError::BadPlatformWidth(_))
        ));
    }

    #[test]
    fn test_factor_out_of_range_rejected() {
        let mut state = GameState::new(1);
        state.difficulty.factor = 1.5;
        assert!(matches!(
            validate(&state),
            Err(RestoreError::BadDifficultyFactor(_))
        ));
    }

    #[test]
    fn test_nan_boost_fields_rejected() {
        let mut state = GameState::new(1);
        state.score.active_boosts.push(crate::sim::score::Boost {
            kind: crate::sim::score::BoostKind::Speed,
            multiplier: f32::NAN,
            started_at: 0.0,
            duration: f64::NAN,
            active: true,
        });
        // A NaN duration never compares as expired; it must not get past
        // validation
        assert!(!state.score.active_boosts[0].expired(1e9));
        assert!(validate(&state).is_err());

        state.score.active_boosts[0].duration = 10.0;
        assert!(validate(&state).is_err());

        state.score.active_boosts[0].multiplier = 1.2;
        state.score.active_boosts[0].started_at = f64::NAN;
        assert!(validate(&state).is_err());
    }

    #[test]
    fn test_nan_multiplier_powerup_rejected() {
        let mut state = GameState::new(1);
        state.powerups.push(crate::sim::state::Powerup {
            id: 1,
            kind: PowerupKind::Multiplier { value: f32::NAN, duration: 12.0 },
            pos: glam::Vec2::new(100.0, 100.0),
            size: POWERUP_SIZE,
            collected: false,
        });
        assert!(matches!(
            validate(&state),
            Err(RestoreError::BadMultiplier(_))
        ));

        state.powerups[0].kind = PowerupKind::Multiplier { value: 2.0, duration: f64::NAN };
        assert!(matches!(
            validate(&state),
            Err(RestoreError::NegativeDuration { .. })
        ));
    }

    #[test]
    fn test_negative_boost_duration_rejected() {
        let mut state = GameState::new(1);
        state.score.active_boosts.push(crate::sim::score::Boost {
            kind: crate::sim::score::BoostKind::Speed,
            multiplier: 1.2,
            started_at: 0.0,
            duration: -1.0,
            active: true,
        });
        assert!(matches!(
            validate(&state),
            Err(RestoreError::NegativeDuration { .. })
        ));
    }
}
