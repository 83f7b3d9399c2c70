// src/analyze/mod.rs
//! Analysis pipeline entry: preprocess → features → score.
//!
//! Both entry points are total: empty or hostile input degrades to a neutral,
//! low-confidence result rather than an error.

pub mod category;
pub mod decay;
pub mod features;
pub mod preprocess;
pub mod scoring;
pub mod stats;
pub mod weights;

use metrics::{counter, histogram};
use tracing::debug;

use crate::calibration::CalibrationStore;
use crate::event::RawEvent;

// Re-export convenient types.
pub use crate::analyze::category::Category;
pub use crate::analyze::features::{FeatureVector, FeatureVectorBuilder};
pub use crate::analyze::preprocess::{process_events, PreprocessParams, Preprocessed, Preprocessor};
pub use crate::analyze::scoring::{Breakdown, Contributor, ScoreResult, Scorer};
pub use crate::analyze::weights::{CategoryWeights, ScoringConfig};

/// Orchestrates the scoring pipeline against one calibration store and one
/// scoring configuration. Cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Analyzer {
    store: CalibrationStore,
    preprocessor: Preprocessor,
    scorer: Scorer,
}

impl Analyzer {
    pub fn new(store: CalibrationStore, config: ScoringConfig, params: PreprocessParams) -> Self {
        Self {
            store,
            preprocessor: Preprocessor::new(params),
            scorer: Scorer::new(config),
        }
    }

    pub fn store(&self) -> &CalibrationStore {
        &self.store
    }

    pub fn config(&self) -> &ScoringConfig {
        self.scorer.config()
    }

    /// Single-source analysis (code-hosting events only).
    pub fn analyze_events(&self, events: &[RawEvent], domain: &str) -> ScoreResult {
        counter!("analyze_requests_total", "path" => "single").increment(1);
        let pre = self.preprocess(events);
        let fv = FeatureVectorBuilder::new(&self.store).single_source(&pre.events, domain);
        self.finish(&fv, domain)
    }

    /// Dual-source analysis. Only the first source is preprocessed; the second
    /// is taken as already clean.
    pub fn analyze_events_with_x(
        &self,
        github_events: &[RawEvent],
        x_events: &[RawEvent],
        domain: &str,
    ) -> ScoreResult {
        counter!("analyze_requests_total", "path" => "dual").increment(1);
        let pre = self.preprocess(github_events);
        let mut all = pre.events;
        all.extend_from_slice(x_events);
        let fv = FeatureVectorBuilder::new(&self.store).dual_source(&all, domain);
        self.finish(&fv, domain)
    }

    fn preprocess(&self, events: &[RawEvent]) -> Preprocessed {
        let pre = self.preprocessor.process(events);
        debug!(
            input = events.len(),
            kept = pre.events.len(),
            merged = pre.merged,
            bots_dropped = pre.bots_dropped,
            "preprocessed events"
        );
        counter!("preprocess_merged_total").increment(pre.merged as u64);
        counter!("preprocess_bots_dropped_total").increment(pre.bots_dropped as u64);
        pre
    }

    fn finish(&self, fv: &FeatureVector, domain: &str) -> ScoreResult {
        let result = self.scorer.score(fv);
        histogram!("analyze_score").record(result.score as f64);
        debug!(
            domain,
            score = result.score,
            confidence = result.confidence,
            features = fv.len(),
            "scored"
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_single_source_is_neutral() {
        let dir = std::env::temp_dir().join("analyze_unit_never_written");
        let a = Analyzer::new(
            CalibrationStore::new(dir),
            ScoringConfig::default(),
            PreprocessParams::default(),
        );
        let r = a.analyze_events(&[], "any-domain");
        assert_eq!(r.score, 50);
        assert_eq!(r.confidence, 0.5);
        assert_eq!(r.posterior, 0.5);
        assert!(r.contributors.is_empty());
        assert_eq!(r.breakdown, Breakdown::default());
    }
}
