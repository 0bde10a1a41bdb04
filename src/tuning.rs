//! Data-driven game balance
//!
//! Every cadence, duration and speed the simulation uses lives here so it can
//! be tweaked from JSON without touching the core. Missing fields fall back to
//! the shipped defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when tuning values are unusable.
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must be a probability in [0, 1] (got {value})")]
    NotProbability { field: &'static str, value: f64 },
}

/// Balance constants for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Speeds (points per second) ===
    /// Road speed at run start
    pub base_scroll_speed: f32,
    /// Added to base speed every 10 currency earned in a run
    pub speed_increment: f32,
    /// Added on top of base speed while boosted
    pub boost_speed_offset: f32,
    /// Added to road speed before the obstacle multipliers apply
    pub obstacle_speed_offset: f32,
    /// Lateral speed of drifting obstacles
    pub drift_speed: f32,

    // === Cadence (seconds) ===
    pub coin_spawn_interval: f64,
    pub obstacle_spawn_interval: f64,
    pub biome_change_interval: f64,

    // === Powerups ===
    pub shield_duration: f64,
    pub boost_duration: f64,
    /// Chance per tick that a powerup spawn is attempted
    pub powerup_roll_chance: f64,
    /// Chance an attempted powerup spawn actually produces one
    pub powerup_spawn_gate: f64,
    /// Chance a currency spawn yields cash instead of a coin
    pub cash_chance: f64,

    // === Car handling ===
    /// Tilt (radians) per point of horizontal drag
    pub tilt_per_point: f32,
    pub max_tilt: f32,
    /// Tilt recovery rate toward level (radians per second)
    pub tilt_return_speed: f32,
    /// Minimum spacing between tire smoke puffs while dragging
    pub smoke_interval: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_scroll_speed: 300.0,
            speed_increment: 15.0,
            boost_speed_offset: 180.0,
            obstacle_speed_offset: 90.0,
            drift_speed: 90.0,

            coin_spawn_interval: 1.0,
            obstacle_spawn_interval: 1.5,
            biome_change_interval: 30.0,

            shield_duration: 10.0,
            boost_duration: 5.0,
            powerup_roll_chance: 0.01,
            powerup_spawn_gate: 0.1,
            cash_chance: 0.05,

            tilt_per_point: 0.01,
            max_tilt: 0.3,
            tilt_return_speed: 3.0,
            smoke_interval: 0.1,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check every value is usable by the simulation
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("base_scroll_speed", self.base_scroll_speed as f64),
            ("coin_spawn_interval", self.coin_spawn_interval),
            ("obstacle_spawn_interval", self.obstacle_spawn_interval),
            ("biome_change_interval", self.biome_change_interval),
            ("shield_duration", self.shield_duration),
            ("boost_duration", self.boost_duration),
            ("max_tilt", self.max_tilt as f64),
        ];
        for (field, value) in positive {
            if value <= 0.0 || !value.is_finite() {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        let non_negative = [
            ("speed_increment", self.speed_increment as f64),
            ("boost_speed_offset", self.boost_speed_offset as f64),
            ("obstacle_speed_offset", self.obstacle_speed_offset as f64),
            ("drift_speed", self.drift_speed as f64),
            ("tilt_return_speed", self.tilt_return_speed as f64),
        ];
        for (field, value) in non_negative {
            if value < 0.0 || !value.is_finite() {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        let probabilities = [
            ("powerup_roll_chance", self.powerup_roll_chance),
            ("powerup_spawn_gate", self.powerup_spawn_gate),
            ("cash_chance", self.cash_chance),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::NotProbability { field, value });
            }
        }

        Ok(())
    }

    /// Keep these values if they validate, otherwise use defaults
    pub fn validated_or_default(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(e) => {
                log::warn!("Invalid tuning ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Load tuning, falling back to defaults on any error
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Invalid tuning ({e}), using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "biome_change_interval": 45.0 }"#).unwrap();
        assert_eq!(tuning.biome_change_interval, 45.0);
        assert_eq!(tuning.shield_duration, 10.0);
        assert_eq!(tuning.base_scroll_speed, 300.0);
    }

    #[test]
    fn test_rejects_bad_probability() {
        let err = Tuning::from_json(r#"{ "cash_chance": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::NotProbability {
                field: "cash_chance",
                value
            } if value == 1.5
        ));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let err = Tuning::from_json(r#"{ "obstacle_spawn_interval": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::NotPositive {
                field: "obstacle_spawn_interval",
                ..
            }
        ));
    }

    #[test]
    fn test_parse_error_keeps_json_source() {
        let err = Tuning::from_json(r#"{ "shield_duration": "long" }"#).unwrap_err();
        let TuningError::Parse(source) = &err else {
            panic!("expected a parse error, got {err:?}");
        };
        assert!(source.is_data());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_garbage_falls_back_to_default() {
        assert_eq!(Tuning::from_json_or_default("not json"), Tuning::default());
    }
}
