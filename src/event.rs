//! # Raw activity events
//! The single input shape of the scoring pipeline. Adapters (GitHub, X, ...)
//! produce these; the core never persists them.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One activity signal for a developer.
///
/// `timestamp` keeps the offset it was reported with: time-of-day heuristics
/// read the hour in that offset, so the same payload scores the same on any host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp: DateTime<FixedOffset>,
    #[serde(default)]
    pub count: f64,
    #[serde(default)]
    pub repo: String,
    #[serde(default)]
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, Value>>,
}

impl RawEvent {
    pub fn new(
        kind: impl Into<String>,
        timestamp: DateTime<FixedOffset>,
        count: f64,
        repo: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            timestamp,
            count,
            repo: repo.into(),
            language: String::new(),
            metadata: None,
        }
    }

    /// Builder: set language.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Builder: attach one metadata entry.
    pub fn meta(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), value);
        self
    }

    /// `true` only when metadata explicitly carries `is_bot: true`.
    pub fn is_marked_bot(&self) -> bool {
        self.metadata
            .as_ref()
            .and_then(|m| m.get("is_bot"))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_wire_shape() {
        let ev: RawEvent = serde_json::from_value(json!({
            "type": "commit",
            "timestamp": "2024-03-04T10:15:00+02:00",
            "count": 12.0,
            "repo": "acme/tool",
            "metadata": { "is_bot": false }
        }))
        .unwrap();
        assert_eq!(ev.kind, "commit");
        assert_eq!(ev.language, "");
        assert!(!ev.is_marked_bot());
    }

    #[test]
    fn bot_flag_requires_explicit_true() {
        let ts = DateTime::parse_from_rfc3339("2024-03-04T10:15:00Z").unwrap();
        let plain = RawEvent::new("commit", ts, 1.0, "acme/tool");
        assert!(!plain.is_marked_bot());
        assert!(!plain.clone().meta("is_bot", json!("true")).is_marked_bot());
        assert!(plain.meta("is_bot", json!(true)).is_marked_bot());
    }
}
