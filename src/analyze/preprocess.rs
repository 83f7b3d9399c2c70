//! Anti-gaming preprocessing.
//!
//! Stages, in order, over a time-sorted owned copy of the input:
//! 1. merge bursts: same `type` + `repo` within `min_spacing` of the previous
//!    kept event fold into it (counts summed, earlier timestamp kept)
//! 2. discount trivial work: small commits x0.5, small merged PRs x0.7
//! 3. time-of-day: 02:00-05:59 x0.3, 09:00-17:59 x1.1
//! 4. drop bot activity (repo name markers or `metadata.is_bot == true`)
//!
//! Merging runs first so a burst receives one combined adjustment.

use chrono::{Duration, Timelike};

use crate::event::RawEvent;

const TRIVIAL_COMMIT_BELOW: f64 = 10.0;
const TRIVIAL_COMMIT_FACTOR: f64 = 0.5;
const TRIVIAL_PR_BELOW: f64 = 5.0;
const TRIVIAL_PR_FACTOR: f64 = 0.7;

const SCRIPTED_HOURS: std::ops::RangeInclusive<u32> = 2..=5;
const SCRIPTED_FACTOR: f64 = 0.3;
const WORKING_HOURS: std::ops::RangeInclusive<u32> = 9..=17;
const WORKING_FACTOR: f64 = 1.1;

const BOT_REPO_MARKERS: [&str; 3] = ["bot", "-ci", "-automation"];

/// Configuration for the preprocessor.
#[derive(Clone, Debug)]
pub struct PreprocessParams {
    /// Events closer than this to the previous kept event (same type + repo) are merged.
    pub min_spacing: Duration,
}

impl Default for PreprocessParams {
    fn default() -> Self {
        Self {
            min_spacing: Duration::minutes(5),
        }
    }
}

/// Output of one preprocessing run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Preprocessed {
    pub events: Vec<RawEvent>,
    /// Events folded into a predecessor.
    pub merged: usize,
    /// Events removed as bot activity.
    pub bots_dropped: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Preprocessor {
    params: PreprocessParams,
}

impl Preprocessor {
    pub fn new(mut params: PreprocessParams) -> Self {
        // Basic parameter hygiene
        if params.min_spacing < Duration::zero() {
            params.min_spacing = Duration::zero();
        }
        Self { params }
    }

    pub fn params(&self) -> &PreprocessParams {
        &self.params
    }

    /// Run all four stages. The caller's slice is only read.
    pub fn process(&self, events: &[RawEvent]) -> Preprocessed {
        let mut sorted = events.to_vec();
        // stable: equal timestamps keep input order, which the merge relies on
        sorted.sort_by_key(|e| e.timestamp);

        let (merged_events, merged) = self.merge_bursts(sorted);

        let mut bots_dropped = 0usize;
        let mut out = Vec::with_capacity(merged_events.len());
        for mut ev in merged_events {
            ev.count *= trivial_factor(&ev);
            ev.count *= timing_factor(&ev);
            if is_bot(&ev) {
                bots_dropped += 1;
                continue;
            }
            out.push(ev);
        }

        Preprocessed {
            events: out,
            merged,
            bots_dropped,
        }
    }

    // -- internals --

    fn merge_bursts(&self, sorted: Vec<RawEvent>) -> (Vec<RawEvent>, usize) {
        let mut kept: Vec<RawEvent> = Vec::with_capacity(sorted.len());
        let mut merged = 0usize;
        for ev in sorted {
            if let Some(last) = kept.last_mut() {
                if last.kind == ev.kind
                    && last.repo == ev.repo
                    && ev.timestamp - last.timestamp < self.params.min_spacing
                {
                    last.count += ev.count;
                    merged += 1;
                    continue;
                }
            }
            kept.push(ev);
        }
        (kept, merged)
    }
}

/// Stateless convenience wrapper with default parameters.
pub fn process_events(events: &[RawEvent]) -> Vec<RawEvent> {
    Preprocessor::default().process(events).events
}

fn trivial_factor(ev: &RawEvent) -> f64 {
    match ev.kind.as_str() {
        "commit" if ev.count < TRIVIAL_COMMIT_BELOW => TRIVIAL_COMMIT_FACTOR,
        "merged_pr" if ev.count < TRIVIAL_PR_BELOW => TRIVIAL_PR_FACTOR,
        _ => 1.0,
    }
}

fn timing_factor(ev: &RawEvent) -> f64 {
    let hour = ev.timestamp.hour();
    if SCRIPTED_HOURS.contains(&hour) {
        SCRIPTED_FACTOR
    } else if WORKING_HOURS.contains(&hour) {
        WORKING_FACTOR
    } else {
        1.0
    }
}

fn is_bot(ev: &RawEvent) -> bool {
    BOT_REPO_MARKERS.iter().any(|m| ev.repo.contains(m)) || ev.is_marked_bot()
}
