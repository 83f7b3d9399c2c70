//! Log-odds aggregation of a feature vector into a bounded score.
//!
//! evidence[c] = base_bias + Σ clip(v, -3, 3)          (per category)
//! L           = base_bias + Σ weight[c] * evidence[c]
//! posterior   = sigmoid(L * score_scale)
//! score       = round(100 * posterior)
//!
//! Confidence is the feature vector's coverage, untouched.

use serde::{Deserialize, Serialize};

use super::features::FeatureVector;
use super::stats::clip;
use super::ScoringConfig;
use crate::analyze::category::Category;

/// Every per-feature contribution is clamped to `[-CONTRIBUTION_BOUND, CONTRIBUTION_BOUND]`.
pub const CONTRIBUTION_BOUND: f64 = 3.0;

/// One feature's clamped contribution, named `"<category>.<feature>"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    pub name: String,
    pub contribution: f64,
}

/// Per-category evidence sums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub shipping: f64,
    pub quality: f64,
    pub influence: f64,
    pub complexity: f64,
    pub collaboration: f64,
    pub reliability: f64,
    pub novelty: f64,
}

impl Breakdown {
    pub fn get(&self, c: Category) -> f64 {
        match c {
            Category::Shipping => self.shipping,
            Category::Quality => self.quality,
            Category::Influence => self.influence,
            Category::Complexity => self.complexity,
            Category::Collaboration => self.collaboration,
            Category::Reliability => self.reliability,
            Category::Novelty => self.novelty,
        }
    }

    fn set(&mut self, c: Category, v: f64) {
        let slot = match c {
            Category::Shipping => &mut self.shipping,
            Category::Quality => &mut self.quality,
            Category::Influence => &mut self.influence,
            Category::Complexity => &mut self.complexity,
            Category::Collaboration => &mut self.collaboration,
            Category::Reliability => &mut self.reliability,
            Category::Novelty => &mut self.novelty,
        };
        *slot = v;
    }
}

/// Final, explainable scoring result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// 0..=100
    pub score: u8,
    /// Data completeness in [0,1].
    pub confidence: f64,
    /// Posterior probability in [0,1].
    pub posterior: f64,
    /// Category order, then feature key order.
    pub contributors: Vec<Contributor>,
    pub breakdown: Breakdown,
}

/// Stateless scorer bound to one configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct Scorer {
    config: ScoringConfig,
}

impl Scorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn score(&self, fv: &FeatureVector) -> ScoreResult {
        let cfg = &self.config;
        let mut breakdown = Breakdown::default();
        let mut contributors = Vec::with_capacity(fv.len());
        let mut log_odds = cfg.base_bias;

        for c in Category::ALL {
            let mut evidence = cfg.base_bias;
            // BTreeMap iteration: keys already sorted
            for (key, v) in fv.category(c) {
                let contribution = clip(*v, -CONTRIBUTION_BOUND, CONTRIBUTION_BOUND);
                evidence += contribution;
                contributors.push(Contributor {
                    name: format!("{}.{}", c.name(), key),
                    contribution,
                });
            }
            breakdown.set(c, evidence);
            log_odds += cfg.weights.get(c) * evidence;
        }

        let posterior = sigmoid(log_odds * cfg.score_scale);
        ScoreResult {
            score: (100.0 * posterior).round() as u8,
            confidence: clip(fv.coverage, 0.0, 1.0),
            posterior,
            contributors,
            breakdown,
        }
    }
}

/// Logistic function, kept inside [0,1] (NaN maps to 0.5).
pub fn sigmoid(x: f64) -> f64 {
    if x.is_nan() {
        return 0.5;
    }
    clip(1.0 / (1.0 + (-x).exp()), 0.0, 1.0)
}
