use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. Call once per process.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new().install_recorder()?;

        describe_counter!(
            "analyze_requests_total",
            "Scoring requests, labelled by path (single|dual)."
        );
        describe_counter!(
            "calibration_fallback_total",
            "Calibration loads that failed and fell back to the built-in default."
        );
        describe_counter!(
            "preprocess_merged_total",
            "Events folded into a preceding duplicate."
        );
        describe_counter!(
            "preprocess_bots_dropped_total",
            "Events dropped as bot activity."
        );
        describe_histogram!("analyze_score", "Distribution of emitted scores (0-100).");

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
