//! Developer reputation service — binary entrypoint.
//! Boots the Axum HTTP server, wiring routes, shared state, and metrics.

use dev_reputation_analyzer::config::AppConfig;
use dev_reputation_analyzer::telemetry::Metrics;
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact logs filtered by `RUST_LOG` (default `dev_reputation_analyzer=info,warn`).
/// No-op if the runtime already installed a subscriber.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("dev_reputation_analyzer=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = AppConfig::from_env();
    let metrics = Metrics::init()?;
    let router = dev_reputation_analyzer::app(&cfg)?.merge(metrics.router());

    Ok(router.into())
}
