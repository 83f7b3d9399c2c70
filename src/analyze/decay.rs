//! Recency helpers: exponential age decay and a short/long horizon blend.
//!
//! Not applied by the analyzer; callers that want recency-weighted counts run
//! `apply_decay` on the events before handing them over.

use chrono::{DateTime, Duration, FixedOffset};

use crate::event::RawEvent;

/// `0.5^(age / half_life)`. Future events and a non-positive half-life weigh 1.
pub fn decay_weight(age: Duration, half_life: Duration) -> f64 {
    if age <= Duration::zero() || half_life <= Duration::zero() {
        return 1.0;
    }
    let ratio = age.num_milliseconds() as f64 / half_life.num_milliseconds() as f64;
    0.5f64.powf(ratio)
}

/// Owned copy of `events` with each count scaled by its decay weight at `now`.
pub fn apply_decay(
    events: &[RawEvent],
    now: DateTime<FixedOffset>,
    half_life: Duration,
) -> Vec<RawEvent> {
    events
        .iter()
        .map(|ev| {
            let mut ev = ev.clone();
            ev.count *= decay_weight(now - ev.timestamp, half_life);
            ev
        })
        .collect()
}

/// `lambda * short + (1 - lambda) * long`, lambda clamped to [0,1].
pub fn blend_horizons(short: f64, long: f64, lambda: f64) -> f64 {
    let l = if lambda.is_nan() { 0.5 } else { lambda.clamp(0.0, 1.0) };
    l * short + (1.0 - l) * long
}
