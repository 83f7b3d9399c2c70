//! HTTP serving layer around the scoring core.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use crate::analyze::{Analyzer, ScoreResult};
use crate::calibration::{CalibrationData, CalibrationError};
use crate::event::RawEvent;
use crate::leaderboard::{now_unix, Leaderboard, Ranked, Window};

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub leaderboard: Arc<Leaderboard>,
}

impl AppState {
    pub fn new(analyzer: Analyzer, leaderboard: Leaderboard) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            leaderboard: Arc::new(leaderboard),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/analyze", post(analyze))
        .route("/leaderboard", get(leaderboard))
        .route("/calibration/bootstrap", post(bootstrap_calibration))
        .route(
            "/calibration/{domain}",
            get(get_calibration).put(put_calibration),
        )
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Deserialize)]
struct AnalyzeReq {
    subject: String,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    events: Vec<RawEvent>,
    #[serde(default)]
    x_events: Vec<RawEvent>,
}

async fn analyze(State(state): State<AppState>, Json(body): Json<AnalyzeReq>) -> Json<ScoreResult> {
    let domain = body.domain.as_deref().unwrap_or(&body.subject);
    let result = if body.x_events.is_empty() {
        state.analyzer.analyze_events(&body.events, domain)
    } else {
        state
            .analyzer
            .analyze_events_with_x(&body.events, &body.x_events, domain)
    };
    state.leaderboard.record(&body.subject, result.score, None);
    Json(result)
}

#[derive(Deserialize)]
struct LeaderboardQuery {
    #[serde(default)]
    window: Window,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    10
}

async fn leaderboard(
    State(state): State<AppState>,
    Query(q): Query<LeaderboardQuery>,
) -> Json<Vec<Ranked>> {
    Json(state.leaderboard.top(q.window, q.limit.min(1000), now_unix()))
}

type ApiError = (StatusCode, String);

fn internal(e: CalibrationError) -> ApiError {
    tracing::warn!(error = %e, "calibration request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

async fn get_calibration(
    State(state): State<AppState>,
    Path(domain): Path<String>,
) -> Result<Json<CalibrationData>, ApiError> {
    state.analyzer.store().load(&domain).map(Json).map_err(internal)
}

async fn put_calibration(
    State(state): State<AppState>,
    Path(domain): Path<String>,
    Json(data): Json<CalibrationData>,
) -> Result<StatusCode, ApiError> {
    state
        .analyzer
        .store()
        .save(&domain, &data)
        .map_err(internal)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn bootstrap_calibration(
    State(state): State<AppState>,
    Json(domains): Json<BTreeMap<String, CalibrationData>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let saved = state
        .analyzer
        .store()
        .bootstrap(&domains)
        .map_err(internal)?;
    Ok(Json(serde_json::json!({ "saved": saved })))
}
