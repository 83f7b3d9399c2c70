//! Feature vector construction.
//!
//! Raw counts are accumulated per (category, event type) and then replaced by
//! their robust z-score against the domain's calibration sample for that
//! category. `coverage` is the data-completeness component of confidence.

use metrics::counter;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

use crate::analyze::category::Category;
use crate::analyze::stats::robust_z;
use crate::calibration::{CalibrationData, CalibrationStore};
use crate::event::RawEvent;

/// Neutral prior when no events were observed.
pub const COVERAGE_NONE: f64 = 0.5;
/// Single-source coverage when any event was observed.
pub const COVERAGE_SINGLE: f64 = 0.8;

const SINGLE_SOURCE_TYPES: [&str; 4] = ["stars", "forks", "followers", "total_stars"];

/// Per-category normalized features. Keys are event types.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureVector {
    pub shipping: BTreeMap<String, f64>,
    pub quality: BTreeMap<String, f64>,
    pub influence: BTreeMap<String, f64>,
    pub complexity: BTreeMap<String, f64>,
    pub collaboration: BTreeMap<String, f64>,
    pub reliability: BTreeMap<String, f64>,
    pub novelty: BTreeMap<String, f64>,
    pub coverage: f64,
}

impl FeatureVector {
    /// Empty vector carrying the neutral coverage prior.
    pub fn neutral() -> Self {
        Self {
            coverage: COVERAGE_NONE,
            ..Self::default()
        }
    }

    pub fn category(&self, c: Category) -> &BTreeMap<String, f64> {
        match c {
            Category::Shipping => &self.shipping,
            Category::Quality => &self.quality,
            Category::Influence => &self.influence,
            Category::Complexity => &self.complexity,
            Category::Collaboration => &self.collaboration,
            Category::Reliability => &self.reliability,
            Category::Novelty => &self.novelty,
        }
    }

    pub fn category_mut(&mut self, c: Category) -> &mut BTreeMap<String, f64> {
        match c {
            Category::Shipping => &mut self.shipping,
            Category::Quality => &mut self.quality,
            Category::Influence => &mut self.influence,
            Category::Complexity => &mut self.complexity,
            Category::Collaboration => &mut self.collaboration,
            Category::Reliability => &mut self.reliability,
            Category::Novelty => &mut self.novelty,
        }
    }

    /// Total number of features across all categories.
    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.category(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn add(&mut self, c: Category, key: &str, count: f64) {
        *self.category_mut(c).entry(key.to_string()).or_insert(0.0) += count;
    }

    fn normalize(&mut self, c: Category, cal: &CalibrationData) {
        let sample = cal.sample(c);
        for v in self.category_mut(c).values_mut() {
            *v = robust_z(*v, sample);
        }
    }
}

/// Single-source features: influence signals only.
pub fn single_source_features(events: &[RawEvent], cal: &CalibrationData) -> FeatureVector {
    let mut fv = FeatureVector::neutral();
    for ev in events {
        if SINGLE_SOURCE_TYPES.contains(&ev.kind.as_str()) {
            fv.add(Category::Influence, &ev.kind, ev.count);
        }
    }
    fv.normalize(Category::Influence, cal);
    if !events.is_empty() {
        fv.coverage = COVERAGE_SINGLE;
    }
    fv
}

/// Dual-source features: every routable type lands in its category.
pub fn dual_source_features(events: &[RawEvent], cal: &CalibrationData) -> FeatureVector {
    let mut fv = FeatureVector::neutral();
    for ev in events {
        if let Some(c) = Category::for_event_type(&ev.kind) {
            fv.add(c, &ev.kind, ev.count);
        }
    }
    for c in Category::ALL {
        fv.normalize(c, cal);
    }

    let distinct: BTreeSet<&str> = events.iter().map(|e| e.kind.as_str()).collect();
    fv.coverage = dual_coverage(distinct.len());
    fv
}

fn dual_coverage(distinct_types: usize) -> f64 {
    match distinct_types {
        n if n > 5 => 0.9,
        n if n > 2 => 0.8,
        0 => COVERAGE_NONE,
        _ => 0.7,
    }
}

/// Builds feature vectors against a domain's stored calibration.
#[derive(Debug, Clone, Copy)]
pub struct FeatureVectorBuilder<'a> {
    store: &'a CalibrationStore,
}

impl<'a> FeatureVectorBuilder<'a> {
    pub fn new(store: &'a CalibrationStore) -> Self {
        Self { store }
    }

    pub fn single_source(&self, events: &[RawEvent], domain: &str) -> FeatureVector {
        single_source_features(events, &self.calibration(domain))
    }

    pub fn dual_source(&self, events: &[RawEvent], domain: &str) -> FeatureVector {
        dual_source_features(events, &self.calibration(domain))
    }

    /// Stored calibration, or the built-in default if it can't be read.
    pub fn calibration(&self, domain: &str) -> CalibrationData {
        match self.store.load(domain) {
            Ok(cal) => cal,
            Err(e) => {
                warn!(error = %e, domain, "calibration unavailable, using default");
                counter!("calibration_fallback_total").increment(1);
                CalibrationData::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn ev(kind: &str, count: f64) -> RawEvent {
        let ts = DateTime::parse_from_rfc3339("2024-05-06T20:00:00Z").unwrap();
        RawEvent::new(kind, ts, count, "acme/tool")
    }

    #[test]
    fn single_source_only_counts_influence_types() {
        let cal = CalibrationData::default();
        let fv = single_source_features(
            &[ev("stars", 10.0), ev("stars", 40.0), ev("commit", 99.0), ev("forks", 5.0)],
            &cal,
        );
        assert_eq!(fv.len(), 2);
        assert!(fv.shipping.is_empty());
        let expected = robust_z(50.0, &cal.influence);
        assert_eq!(fv.influence["stars"], expected);
        assert_eq!(fv.coverage, COVERAGE_SINGLE);
    }

    #[test]
    fn single_source_ignores_total_forks() {
        let fv = single_source_features(&[ev("total_forks", 3.0)], &CalibrationData::default());
        assert!(fv.is_empty());
        // events were present, even if none were usable
        assert_eq!(fv.coverage, COVERAGE_SINGLE);
    }

    #[test]
    fn empty_inputs_are_neutral() {
        let cal = CalibrationData::default();
        assert_eq!(single_source_features(&[], &cal), FeatureVector::neutral());
        assert_eq!(dual_source_features(&[], &cal), FeatureVector::neutral());
    }

    #[test]
    fn dual_source_routes_and_normalizes_per_category() {
        let cal = CalibrationData::default();
        let fv = dual_source_features(
            &[
                ev("commit", 12.0),
                ev("merged_pr", 3.0),
                ev("twitter_followers", 800.0),
                ev("twitter_tweet", 4.0),
                ev("twitter_replies", 9.0),
                ev("twitter_avg_likes", 0.5),
                ev("language", 3.0),
                ev("unknown_thing", 1.0),
            ],
            &cal,
        );
        assert_eq!(fv.shipping["commit"], robust_z(12.0, &cal.shipping));
        assert_eq!(fv.influence["twitter_followers"], robust_z(800.0, &cal.influence));
        assert_eq!(fv.novelty["twitter_tweet"], robust_z(4.0, &cal.novelty));
        assert_eq!(fv.collaboration["twitter_replies"], robust_z(9.0, &cal.collaboration));
        assert_eq!(fv.quality["twitter_avg_likes"], robust_z(0.5, &cal.quality));
        assert_eq!(fv.complexity["language"], robust_z(3.0, &cal.complexity));
        assert!(fv.reliability.is_empty());
        assert_eq!(fv.len(), 7);
        // 8 distinct types observed, including the unroutable one
        assert_eq!(fv.coverage, 0.9);
    }

    #[test]
    fn dual_coverage_steps() {
        assert_eq!(dual_coverage(0), 0.5);
        assert_eq!(dual_coverage(1), 0.7);
        assert_eq!(dual_coverage(2), 0.7);
        assert_eq!(dual_coverage(3), 0.8);
        assert_eq!(dual_coverage(5), 0.8);
        assert_eq!(dual_coverage(6), 0.9);
    }

    #[test]
    fn coverage_never_decreases_with_more_types() {
        let kinds = [
            "commit",
            "stars",
            "language",
            "twitter_tweet",
            "twitter_replies",
            "twitter_avg_likes",
            "forks",
        ];
        let cal = CalibrationData::default();
        let mut prev = 0.0;
        for n in 0..=kinds.len() {
            let events: Vec<RawEvent> = kinds[..n].iter().map(|k| ev(k, 1.0)).collect();
            let cov = dual_source_features(&events, &cal).coverage;
            assert!(cov >= prev, "n={n} cov={cov} prev={prev}");
            prev = cov;
        }
    }
}
