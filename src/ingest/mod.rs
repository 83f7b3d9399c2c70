// src/ingest/mod.rs
pub mod types;

use crate::event::RawEvent;
use crate::ingest::types::EventSource;
use metrics::{counter, describe_counter};
use std::sync::OnceLock;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceLock<()> = OnceLock::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_events_total", "Total events returned by sources.");
        describe_counter!(
            "ingest_source_errors_total",
            "Source fetch errors (the source is skipped)."
        );
    });
}

/// Fetch from every source and concatenate the results in source order.
/// A failing source is logged and skipped; collection itself never fails.
pub async fn collect_events(sources: &[Box<dyn EventSource>], subject: &str) -> Vec<RawEvent> {
    ensure_metrics_described();

    let mut out = Vec::new();
    for s in sources {
        match s.fetch_events(subject).await {
            Ok(mut v) => {
                counter!("ingest_events_total", "source" => s.name()).increment(v.len() as u64);
                out.append(&mut v);
            }
            Err(e) => {
                tracing::warn!(error = ?e, source = s.name(), subject, "source error");
                counter!("ingest_source_errors_total", "source" => s.name()).increment(1);
            }
        }
    }
    out
}
