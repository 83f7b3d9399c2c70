// src/config/app.rs
//! Process configuration from environment variables (a `.env` file is
//! honoured by the binary via `dotenvy`).

use anyhow::Result;
use chrono::Duration;
use std::{env, path::PathBuf};

use crate::analyze::{PreprocessParams, ScoringConfig};

pub const ENV_CALIBRATION_DIR: &str = "CALIBRATION_DIR";
pub const ENV_SCORING_CONFIG_PATH: &str = "SCORING_CONFIG_PATH";
pub const ENV_MERGE_WINDOW_SECS: &str = "MERGE_WINDOW_SECS";
pub const ENV_LEADERBOARD_CAPACITY: &str = "LEADERBOARD_CAPACITY";

pub const DEFAULT_CALIBRATION_DIR: &str = "calibration";
pub const DEFAULT_SCORING_CONFIG_PATH: &str = "config/scoring.toml";
pub const DEFAULT_MERGE_WINDOW_SECS: i64 = 300;
pub const DEFAULT_LEADERBOARD_CAPACITY: usize = 2000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub calibration_dir: PathBuf,
    pub scoring_config_path: PathBuf,
    pub merge_window_secs: i64,
    pub leaderboard_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            calibration_dir: PathBuf::from(DEFAULT_CALIBRATION_DIR),
            scoring_config_path: PathBuf::from(DEFAULT_SCORING_CONFIG_PATH),
            merge_window_secs: DEFAULT_MERGE_WINDOW_SECS,
            leaderboard_capacity: DEFAULT_LEADERBOARD_CAPACITY,
        }
    }
}

impl AppConfig {
    /// Read from the environment; unset or unparsable values keep defaults.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            calibration_dir: env::var(ENV_CALIBRATION_DIR)
                .map(PathBuf::from)
                .unwrap_or(d.calibration_dir),
            scoring_config_path: env::var(ENV_SCORING_CONFIG_PATH)
                .map(PathBuf::from)
                .unwrap_or(d.scoring_config_path),
            merge_window_secs: env::var(ENV_MERGE_WINDOW_SECS)
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .filter(|v: &i64| *v >= 0)
                .unwrap_or(d.merge_window_secs),
            leaderboard_capacity: env::var(ENV_LEADERBOARD_CAPACITY)
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .filter(|v: &usize| *v > 0)
                .unwrap_or(d.leaderboard_capacity),
        }
    }

    pub fn preprocess_params(&self) -> PreprocessParams {
        PreprocessParams {
            min_spacing: Duration::seconds(self.merge_window_secs),
        }
    }

    /// Scoring configuration from `scoring_config_path` (neutral if absent).
    pub fn scoring_config(&self) -> Result<ScoringConfig> {
        ScoringConfig::load_or_default(&self.scoring_config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear() {
        for k in [
            ENV_CALIBRATION_DIR,
            ENV_SCORING_CONFIG_PATH,
            ENV_MERGE_WINDOW_SECS,
            ENV_LEADERBOARD_CAPACITY,
        ] {
            env::remove_var(k);
        }
    }

    #[test]
    #[serial]
    fn defaults_when_unset() {
        clear();
        let c = AppConfig::from_env();
        assert_eq!(c.calibration_dir, PathBuf::from("calibration"));
        assert_eq!(c.merge_window_secs, 300);
        assert_eq!(c.preprocess_params().min_spacing, Duration::minutes(5));
    }

    #[test]
    #[serial]
    fn env_overrides_and_bad_values() {
        clear();
        env::set_var(ENV_CALIBRATION_DIR, "/tmp/cal");
        env::set_var(ENV_MERGE_WINDOW_SECS, "60");
        env::set_var(ENV_LEADERBOARD_CAPACITY, "zero");
        let c = AppConfig::from_env();
        assert_eq!(c.calibration_dir, PathBuf::from("/tmp/cal"));
        assert_eq!(c.merge_window_secs, 60);
        assert_eq!(c.leaderboard_capacity, DEFAULT_LEADERBOARD_CAPACITY);
        clear();
    }
}
