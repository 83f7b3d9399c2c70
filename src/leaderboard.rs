//! # Leaderboard
//! In-memory, capacity-bounded log of scored subjects, ranked over a time
//! window (24h / 7d / 30d / all). Lives in the serving layer; the scoring
//! core never reads it.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Ranking window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Window {
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[default]
    #[serde(rename = "all")]
    All,
}

impl Window {
    pub fn duration(&self) -> Option<Duration> {
        match self {
            Window::Day => Some(Duration::from_secs(24 * 3600)),
            Window::Week => Some(Duration::from_secs(7 * 24 * 3600)),
            Window::Month => Some(Duration::from_secs(30 * 24 * 3600)),
            Window::All => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    subject: String,
    score: u8,
    ts_unix: u64,
}

/// One ranked row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranked {
    pub rank: usize,
    pub subject: String,
    pub score: u8,
    pub ts_unix: u64,
}

#[derive(Debug)]
pub struct Leaderboard {
    inner: Mutex<VecDeque<Entry>>,
    cap: usize,
}

impl Leaderboard {
    pub fn with_capacity(cap: usize) -> Self {
        let cap = cap.clamp(1, 100_000);
        Self {
            inner: Mutex::new(VecDeque::with_capacity(cap.min(10_000))),
            cap,
        }
    }

    /// Record a score. If `ts_unix` is `None`, current time is used.
    pub fn record(&self, subject: &str, score: u8, ts_unix: Option<u64>) {
        let entry = Entry {
            subject: subject.to_string(),
            score,
            ts_unix: ts_unix.unwrap_or_else(now_unix),
        };
        let mut v = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        v.push_back(entry);
        while v.len() > self.cap {
            v.pop_front();
        }
    }

    /// Top `limit` subjects by their most recent score inside `window`,
    /// measured back from `now_unix`. Ties rank by subject name.
    pub fn top(&self, window: Window, limit: usize, now_unix: u64) -> Vec<Ranked> {
        let cutoff = window
            .duration()
            .map(|d| now_unix.saturating_sub(d.as_secs()));

        let latest: HashMap<String, (u8, u64)> = {
            let v = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            let mut m: HashMap<String, (u8, u64)> = HashMap::new();
            for e in v.iter() {
                if cutoff.is_some_and(|c| e.ts_unix < c) {
                    continue;
                }
                let slot = m.entry(e.subject.clone()).or_insert((e.score, e.ts_unix));
                if e.ts_unix >= slot.1 {
                    *slot = (e.score, e.ts_unix);
                }
            }
            m
        };

        let mut rows: Vec<(String, u8, u64)> = latest
            .into_iter()
            .map(|(s, (score, ts))| (s, score, ts))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        rows.into_iter()
            .take(limit)
            .enumerate()
            .map(|(i, (subject, score, ts_unix))| Ranked {
                rank: i + 1,
                subject,
                score,
                ts_unix,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Current UNIX time in seconds.
pub fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
