//! Height-to-score conversion and the timed-boost state machine
//!
//! Score only advances when the player reaches a new maximum altitude, in
//! whole milestone increments scaled by the active multiplier. Crossing a
//! boost bucket awards one random timed boost of a kind not already active.
//! All timing is sim-clock seconds; no wall clock.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Physical parameter a timed boost scales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoostKind {
    Speed,
    Jump,
    Gravity,
}

impl BoostKind {
    pub const ALL: [BoostKind; 3] = [BoostKind::Speed, BoostKind::Jump, BoostKind::Gravity];

    /// Reward multiplier for this kind (a gravity boost weakens gravity)
    pub fn multiplier(self) -> f32 {
        match self {
            BoostKind::Speed => 1.2,
            BoostKind::Jump => 1.2,
            BoostKind::Gravity => 0.8,
        }
    }
}

/// A temporary multiplicative modifier on one physical parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boost {
    pub kind: BoostKind,
    pub multiplier: f32,
    /// Sim-time seconds when the boost was granted
    pub started_at: f64,
    pub duration: f64,
    pub active: bool,
}

impl Boost {
    pub fn expired(&self, now: f64) -> bool {
        now - self.started_at >= self.duration
    }

    pub fn remaining(&self, now: f64) -> f64 {
        (self.duration - (now - self.started_at)).max(0.0)
    }
}

/// Changes the score engine asks the tick to apply to the body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoostChange {
    Granted(Boost),
    Expired(BoostKind),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreState {
    /// Never decreases except through a full reset
    pub score: f32,
    /// Smallest player-bottom y ever reached (smaller y = higher altitude)
    pub highest_height: f32,
    pub multiplier: f32,
    /// Sim-time expiry for the active multiplier
    pub multiplier_ends_at: Option<f64>,
    /// At most one entry per kind
    pub active_boosts: Vec<Boost>,
}

impl ScoreState {
    pub fn new() -> Self {
        Self {
            score: 0.0,
            highest_height: SCREEN_HEIGHT,
            multiplier: 1.0,
            multiplier_ends_at: None,
            active_boosts: Vec::new(),
        }
    }

    /// Altitude in px above the starting ground
    pub fn height(&self) -> f32 {
        (self.highest_height - SCREEN_HEIGHT).abs()
    }

    /// Advance score from the player's bottom edge and expire timed state.
    /// Returned changes must be applied to the body's boost factors.
    pub fn update(&mut self, player_bottom: f32, now: f64, rng: &mut impl Rng) -> Vec<BoostChange> {
        let mut changes = Vec::new();
        let old_score = self.score;

        // Score only advances on a new maximum altitude
        if player_bottom < self.highest_height {
            self.highest_height = player_bottom;

            if self.height() > (self.score + 1.0) * SCORE_THRESHOLD {
                self.score += self.multiplier;
            }

            let old_bucket = (old_score / BOOST_THRESHOLD).floor();
            let new_bucket = (self.score / BOOST_THRESHOLD).floor();
            if old_bucket != new_bucket {
                if let Some(boost) = self.grant_boost(now, rng) {
                    changes.push(BoostChange::Granted(boost));
                }
            }
        }

        // Expire timed boosts
        let mut i = 0;
        while i < self.active_boosts.len() {
            if self.active_boosts[i].expired(now) {
                let mut boost = self.active_boosts.swap_remove(i);
                boost.active = false;
                changes.push(BoostChange::Expired(boost.kind));
            } else {
                i += 1;
            }
        }

        // Expire the score multiplier
        if let Some(ends_at) = self.multiplier_ends_at {
            if now >= ends_at {
                self.multiplier = 1.0;
                self.multiplier_ends_at = None;
            }
        }

        changes
    }

    /// Award one random boost of a kind not currently active; none when
    /// all three kinds already run
    fn grant_boost(&mut self, now: f64, rng: &mut impl Rng) -> Option<Boost> {
        let available: Vec<BoostKind> = BoostKind::ALL
            .into_iter()
            .filter(|kind| !self.active_boosts.iter().any(|b| b.kind == *kind))
            .collect();
        if available.is_empty() {
            return None;
        }

        let kind = available[rng.random_range(0..available.len())];
        let (lo, hi) = BOOST_DURATION_RANGE;
        let boost = Boost {
            kind,
            multiplier: kind.multiplier(),
            started_at: now,
            duration: rng.random_range(lo..hi),
            active: true,
        };
        self.active_boosts.push(boost);
        Some(boost)
    }

    /// Multiplier powerup pickup
    pub fn activate_multiplier(&mut self, value: f32, duration: f64, now: f64) {
        self.multiplier = value;
        self.multiplier_ends_at = Some(now + duration);
    }
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::new()
    }
}
