use crate::error::ArenaError;
use serde::{Deserialize, Serialize};

/// Game tuning, read from the same camelCase keys the browser config uses.
/// Keys the core does not need are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    // Grid metrics
    pub width: f32,
    pub height: f32,
    pub unit_size: f32,
    pub disc_size: f32,

    // Units
    pub minimum_distance: f32,

    // Game play
    /// Milliseconds a thrown disc flies before it turns back
    pub disc_return_time: f64,
    pub disc_speed: f32,
    pub white_disc_percent: f32,
    pub warrior_accuracy: f32,
    pub bulldog_accuracy: f32,
    pub leader_accuracy: f32,
    /// Seconds between regeneration passes
    pub regeneration_time: f64,

    // Colors
    pub tran_color: String,
    pub warrior_color: String,
    pub bulldog_color: String,
    pub leader_color: String,
    pub guard_color: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            unit_size: 16.0,
            disc_size: 4.0,
            minimum_distance: 250.0,
            disc_return_time: 1000.0,
            disc_speed: 4.0,
            white_disc_percent: 20.0,
            warrior_accuracy: 85.0,
            bulldog_accuracy: 90.0,
            leader_accuracy: 95.0,
            regeneration_time: 6.0,
            tran_color: "rgba(255, 0, 0, 1)".to_string(),
            warrior_color: "rgba(97, 170, 200, 1)".to_string(),
            bulldog_color: "rgba(255, 0, 255, 1)".to_string(),
            leader_color: "rgba(0, 127, 255, 1)".to_string(),
            guard_color: "rgba(255, 255, 127, 1)".to_string(),
        }
    }
}

impl Config {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Config, ArenaError> {
        let config: Config = serde_json::from_str(json).map_err(ArenaError::ConfigParse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ArenaError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ArenaError::InvalidConfig(format!(
                "grid must have positive size, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.unit_size > 0.0 && self.disc_size > 0.0) {
            return Err(ArenaError::InvalidConfig(format!(
                "unitSize and discSize must be positive, got {} and {}",
                self.unit_size, self.disc_size
            )));
        }
        for (key, accuracy) in [
            ("warriorAccuracy", self.warrior_accuracy),
            ("bulldogAccuracy", self.bulldog_accuracy),
            ("leaderAccuracy", self.leader_accuracy),
        ] {
            if !(0.0..=100.0).contains(&accuracy) {
                return Err(ArenaError::InvalidConfig(format!(
                    "{} must be within 0..=100, got {}",
                    key, accuracy
                )));
            }
        }
        if self.regeneration_time <= 0.0 {
            return Err(ArenaError::InvalidConfig(format!(
                "regenerationTime must be positive, got {}",
                self.regeneration_time
            )));
        }
        Ok(())
    }

    /// Grid diagonal, the longest possible unit-to-player distance
    #[inline]
    pub fn diagonal(&self) -> f32 {
        (self.width * self.width + self.height * self.height).sqrt()
    }

    #[inline]
    pub fn regeneration_interval_ms(&self) -> f64 {
        self.regeneration_time * 1000.0
    }

    pub fn bounds(&self) -> GridBounds {
        GridBounds {
            width: self.width,
            height: self.height,
            minimum_distance: self.minimum_distance,
        }
    }
}

/// What destination selection needs to know about the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridBounds {
    pub width: f32,
    pub height: f32,
    pub minimum_distance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = Config::from_json(r#"{"width": 1024, "enemyCount": 3, "discSpeed": 6}"#).unwrap();
        assert_eq!(config.width, 1024.0);
        assert_eq!(config.height, 600.0);
        assert_eq!(config.disc_speed, 6.0);
        assert_eq!(config.minimum_distance, 250.0);
    }

    #[test]
    fn test_diagonal() {
        let config = Config::default();
        assert!((config.diagonal() - 1000.0).abs() < 1e-3);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Config::from_json(r#"{"width": 0}"#),
            Err(ArenaError::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{"leaderAccuracy": 120}"#),
            Err(ArenaError::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::from_json("not json"),
            Err(ArenaError::ConfigParse(_))
        ));
    }
}
