// src/ingest/types.rs
use anyhow::Result;

use crate::event::RawEvent;

/// Upstream adapter boundary (GitHub, X, ...). Implementations own their
/// transport, retries and pooling; the core only sees the events.
#[async_trait::async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch_events(&self, subject: &str) -> Result<Vec<RawEvent>>;
    fn name(&self) -> &'static str;
}
