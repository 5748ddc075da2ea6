//! Score-driven difficulty feedback loop
//!
//! Produces the generation parameters the world generator consumes: platform
//! widths shrink, vertical spacing grows toward (never past) the jump apex,
//! and probability mass shifts from Static toward the challenging kinds.
//! The factor is quantized: it moves only when the level does.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::PlatformKind;
use crate::consts::*;

/// Categorical weights over platform kinds, in [`TypeWeights::KINDS`] order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TypeWeights {
    pub weights: [f32; 4],
}

impl TypeWeights {
    pub const KINDS: [PlatformKind; 4] = [
        PlatformKind::Static,
        PlatformKind::Oscillating,
        PlatformKind::Wrapping,
        PlatformKind::Decaying,
    ];

    pub fn weight(&self, kind: PlatformKind) -> f32 {
        let index = Self::KINDS
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_default();
        self.weights[index]
    }

    /// Sample a kind from the categorical distribution
    pub fn sample(&self, rng: &mut impl Rng) -> PlatformKind {
        let total: f32 = self.weights.iter().sum();
        let mut roll = rng.random_range(0.0..total);
        for (kind, weight) in Self::KINDS.iter().zip(self.weights) {
            if roll < weight {
                return *kind;
            }
            roll -= weight;
        }
        PlatformKind::Static
    }
}

/// Tunable ranges and weights consumed by the world generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Platform width range (px)
    pub width_range: (f32, f32),
    /// Vertical gap range between consecutive platforms (px)
    pub spacing_range: (f32, f32),
    pub type_weights: TypeWeights,
}

impl GenerationParams {
    /// Parameters for a given difficulty factor
    pub fn for_factor(factor: f32) -> Self {
        Self {
            width_range: (
                (1.7 - factor) * PLAYER_WIDTH,
                (2.0 - factor) * PLAYER_WIDTH,
            ),
            // Spacing stays inside 0.4..=1.0 of the jump apex so every gap
            // remains clearable
            spacing_range: (
                (0.4 + factor).min(0.7) * MAX_JUMP_HEIGHT,
                (0.6 + factor).min(1.0) * MAX_JUMP_HEIGHT,
            ),
            // Static keeps a floor weight; challenging kinds are capped
            type_weights: TypeWeights {
                weights: [
                    (1.0 - factor).max(0.3),
                    (0.4 * factor).min(0.4),
                    (0.4 * factor).min(0.4),
                    (0.2 * factor).min(0.2),
                ],
            },
        }
    }
}

/// Difficulty engine state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyState {
    /// Monotone non-decreasing
    pub level: u32,
    /// Monotone non-decreasing, quantized in `FACTOR_INCREMENT` steps
    pub factor: f32,
}

impl DifficultyState {
    pub fn new() -> Self {
        Self { level: 0, factor: 0.0 }
    }

    /// Pure function of accumulated score. Returns the new generation
    /// parameters when, and only when, the level increased.
    pub fn update(&mut self, score: f32) -> Option<GenerationParams> {
        if score < DIFFICULTY_THRESHOLD {
            return None;
        }
        let level = ((score / DIFFICULTY_THRESHOLD) as u32).min(MAX_DIFFICULTY_LEVEL);
        if level <= self.level {
            return None;
        }
        self.level = level;
        self.factor = (self.factor + FACTOR_INCREMENT).min(MAX_DIFFICULTY_FACTOR);
        Some(GenerationParams::for_factor(self.factor))
    }

    /// Parameters currently implied by the factor
    pub fn params(&self) -> GenerationParams {
        GenerationParams::for_factor(self.factor)
    }
}

impl Default for DifficultyState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_two_level_ups_reach_exactly_two_increments() {
        let mut difficulty = DifficultyState::new();
        for score in 1..=25 {
            difficulty.update(score as f32);
        }
        assert_eq!(difficulty.level, 2);
        assert!((difficulty.factor - 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_level_and_factor_caps() {
        let mut difficulty = DifficultyState::new();
        for score in 1..=200 {
            difficulty.update(score as f32);
        }
        assert_eq!(difficulty.level, MAX_DIFFICULTY_LEVEL);
        assert!((difficulty.factor - MAX_DIFFICULTY_FACTOR).abs() < 1e-5);

        // Past the cap nothing changes
        assert!(difficulty.update(10_000.0).is_none());
    }

    #[test]
    fn test_params_respect_floors_and_caps() {
        for step in 0..=5 {
            let factor = step as f32 * FACTOR_INCREMENT;
            let params = GenerationParams::for_factor(factor);

            assert!(params.spacing_range.0 < params.spacing_range.1);
            assert!(params.spacing_range.1 <= MAX_JUMP_HEIGHT);
            assert!(params.width_range.0 < params.width_range.1);

            assert!(params.type_weights.weight(PlatformKind::Static) >= 0.3);
            assert!(params.type_weights.weight(PlatformKind::Oscillating) <= 0.4);
            assert!(params.type_weights.weight(PlatformKind::Wrapping) <= 0.4);
            assert!(params.type_weights.weight(PlatformKind::Decaying) <= 0.2);
        }
    }

    #[test]
    fn test_weights_sample_only_static_at_factor_zero() {
        use rand::SeedableRng;
        let params = GenerationParams::for_factor(0.0);
        let mut rng = rand_pcg::Pcg32::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(params.type_weights.sample(&mut rng), PlatformKind::Static);
        }
    }

    proptest! {
        /// Factor never decreases and moves only on a level transition
        #[test]
        fn factor_monotone_and_quantized(increments in proptest::collection::vec(0.0f32..5.0, 1..100)) {
            let mut difficulty = DifficultyState::new();
            let mut score = 0.0f32;
            let mut last_level = 0u32;
            let mut last_factor = 0.0f32;
            for increment in increments {
                score += increment;
                let pushed = difficulty.update(score);
                prop_assert!(difficulty.level >= last_level);
                prop_assert!(difficulty.factor >= last_factor);
                if pushed.is_none() {
                    prop_assert_eq!(difficulty.factor, last_factor);
                    prop_assert_eq!(difficulty.level, last_level);
                }
                last_level = difficulty.level;
                last_factor = difficulty.factor;
            }
        }
    }
}
