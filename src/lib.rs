// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod calibration;
pub mod config;
pub mod event;
pub mod ingest;
pub mod leaderboard;
pub mod telemetry;

// Scoring pipeline (preprocess, stats, features, scoring)
pub mod analyze;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{Analyzer, ScoreResult, ScoringConfig};
pub use crate::api::create_router as router;
pub use crate::calibration::{CalibrationData, CalibrationError, CalibrationStore};
pub use crate::event::RawEvent;

use crate::config::AppConfig;
use crate::leaderboard::Leaderboard;
use tracing::info;

/// Build the application router from configuration (no metrics endpoint;
/// the binary merges that in after installing the global recorder).
pub fn app(cfg: &AppConfig) -> anyhow::Result<axum::Router> {
    let scoring = cfg.scoring_config()?;
    let analyzer = Analyzer::new(
        CalibrationStore::new(&cfg.calibration_dir),
        scoring,
        cfg.preprocess_params(),
    );
    info!(
        calibration_dir = %cfg.calibration_dir.display(),
        base_bias = scoring.base_bias,
        score_scale = scoring.score_scale,
        "analyzer ready"
    );
    let state = api::AppState::new(analyzer, Leaderboard::with_capacity(cfg.leaderboard_capacity));
    Ok(api::create_router(state))
}
