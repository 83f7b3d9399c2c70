//! Scoring configuration: base bias, sensitivity, and per-category weights.
//!
//! Built once (default or TOML file) and handed to the scorer; nothing here
//! is mutable after construction.
//!
//! TOML shape:
//! ```toml
//! base_bias = 0.0
//! score_scale = 1.0
//!
//! [weights]
//! shipping = 0.25
//! quality = 0.20
//! influence = 0.20
//! complexity = 0.15
//! collaboration = 0.10
//! reliability = 0.07
//! novelty = 0.03
//! ```

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};
use tracing::info;

use crate::analyze::category::Category;

/// Weight sums further than this from 1.0 are rejected.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub shipping: f64,
    pub quality: f64,
    pub influence: f64,
    pub complexity: f64,
    pub collaboration: f64,
    pub reliability: f64,
    pub novelty: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            shipping: 0.25,
            quality: 0.20,
            influence: 0.20,
            complexity: 0.15,
            collaboration: 0.10,
            reliability: 0.07,
            novelty: 0.03,
        }
    }
}

impl CategoryWeights {
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

    pub fn sum(&self) -> f64 {
        Category::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

/// The neutral configuration is the canonical default.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub base_bias: f64,
    #[serde(default = "default_score_scale")]
    pub score_scale: f64,
    #[serde(default)]
    pub weights: CategoryWeights,
}

fn default_score_scale() -> f64 {
    1.0
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_bias: 0.0,
            score_scale: default_score_scale(),
            weights: CategoryWeights::default(),
        }
    }
}

impl ScoringConfig {
    /// Reject configurations that would break the score's invariants.
    pub fn validate(&self) -> Result<()> {
        if !self.base_bias.is_finite() {
            bail!("base_bias must be finite");
        }
        if !(self.score_scale.is_finite() && self.score_scale > 0.0) {
            bail!("score_scale must be finite and > 0, got {}", self.score_scale);
        }
        for c in Category::ALL {
            let w = self.weights.get(c);
            if !(w.is_finite() && w >= 0.0) {
                bail!("weight for {c} must be finite and >= 0, got {w}");
            }
        }
        let sum = self.weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            bail!("category weights must sum to 1.0, got {sum}");
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: ScoringConfig = toml::from_str(s).context("parsing scoring config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a file. A missing file means the default configuration.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(s) => {
                let cfg = Self::from_toml_str(&s)
                    .with_context(|| format!("loading scoring config from {}", path.display()))?;
                info!(path = %path.display(), "scoring config loaded");
                Ok(cfg)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no scoring config file, using neutral default");
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }
}
