//! # Calibration store
//! Per-domain reference samples used as the comparison distribution for
//! robust z-scoring. One JSON file per domain under a base directory:
//!
//! ```json
//! { "shipping": [1.0, 3.0], "quality": [...], "influence": [...], ... }
//! ```
//!
//! A missing file is the normal first-run state and yields
//! `CalibrationData::default()`. Writes for the same domain are serialized
//! in-process and land via temp file + rename, so readers never observe a
//! half-written file.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::info;

use crate::analyze::category::Category;

/// Errors from reading or writing calibration files.
#[derive(Error, Debug)]
pub enum CalibrationError {
    #[error("calibration I/O for domain '{domain}': {source}")]
    Io {
        domain: String,
        #[source]
        source: io::Error,
    },

    #[error("calibration file for domain '{domain}' is not valid JSON: {source}")]
    Decode {
        domain: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode calibration for domain '{domain}': {source}")]
    Encode {
        domain: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("bootstrap stopped at domain '{domain}': {source}")]
    Bootstrap {
        domain: String,
        #[source]
        source: Box<CalibrationError>,
    },
}

/// Seven reference samples, one per evidence category.
/// Arrays missing from a file read as empty, not as the built-in baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationData {
    #[serde(default)]
    pub shipping: Vec<f64>,
    #[serde(default)]
    pub quality: Vec<f64>,
    #[serde(default)]
    pub influence: Vec<f64>,
    #[serde(default)]
    pub complexity: Vec<f64>,
    #[serde(default)]
    pub collaboration: Vec<f64>,
    #[serde(default)]
    pub reliability: Vec<f64>,
    #[serde(default)]
    pub novelty: Vec<f64>,
}

impl Default for CalibrationData {
    /// Built-in baseline: typical magnitudes per category.
    fn default() -> Self {
        Self {
            shipping: vec![1.0, 3.0, 5.0, 10.0, 20.0, 40.0],
            quality: vec![0.1, 0.3, 0.5, 0.7, 0.9],
            influence: vec![1.0, 5.0, 10.0, 50.0, 100.0, 500.0],
            complexity: vec![1.0, 2.0, 3.0, 5.0, 8.0],
            collaboration: vec![1.0, 2.0, 5.0, 10.0, 20.0],
            reliability: vec![0.5, 0.7, 0.8, 0.9, 0.95],
            novelty: vec![1.0, 2.0, 4.0, 8.0, 16.0],
        }
    }
}

impl CalibrationData {
    /// Reference sample for one category.
    pub fn sample(&self, category: Category) -> &[f64] {
        match category {
            Category::Shipping => &self.shipping,
            Category::Quality => &self.quality,
            Category::Influence => &self.influence,
            Category::Complexity => &self.complexity,
            Category::Collaboration => &self.collaboration,
            Category::Reliability => &self.reliability,
            Category::Novelty => &self.novelty,
        }
    }
}

/// File-backed store. Cloning shares the per-domain write locks.
#[derive(Debug, Clone)]
pub struct CalibrationStore {
    base_dir: PathBuf,
    write_locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

impl CalibrationStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            write_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the file backing `domain`.
    pub fn path_for(&self, domain: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", sanitize_domain(domain)))
    }

    /// Load a domain's calibration; defaults when no file exists yet.
    pub fn load(&self, domain: &str) -> Result<CalibrationData, CalibrationError> {
        let path = self.path_for(domain);
        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(CalibrationData::default());
            }
            Err(source) => {
                return Err(CalibrationError::Io {
                    domain: domain.to_string(),
                    source,
                })
            }
        };
        serde_json::from_slice(&bytes).map_err(|source| CalibrationError::Decode {
            domain: domain.to_string(),
            source,
        })
    }

    /// Persist a domain's calibration, creating the base directory if needed.
    pub fn save(&self, domain: &str, data: &CalibrationData) -> Result<(), CalibrationError> {
        let io_err = |source| CalibrationError::Io {
            domain: domain.to_string(),
            source,
        };

        let json = serde_json::to_vec_pretty(data).map_err(|source| CalibrationError::Encode {
            domain: domain.to_string(),
            source,
        })?;

        let lock = self.domain_lock(domain);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        std::fs::create_dir_all(&self.base_dir).map_err(io_err)?;
        let path = self.path_for(domain);
        let tmp = path.with_extension(format!(
            "json.tmp.{}.{}",
            std::process::id(),
            TMP_SEQ.fetch_add(1, Ordering::Relaxed)
        ));
        if let Err(e) = std::fs::write(&tmp, &json).and_then(|_| std::fs::rename(&tmp, &path)) {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(e));
        }

        info!(domain, path = %path.display(), "calibration saved");
        Ok(())
    }

    /// Save many domains in key order, stopping at the first failure.
    /// Returns the number of domains written.
    pub fn bootstrap(
        &self,
        domains: &BTreeMap<String, CalibrationData>,
    ) -> Result<usize, CalibrationError> {
        for (domain, data) in domains {
            self.save(domain, data)
                .map_err(|e| CalibrationError::Bootstrap {
                    domain: domain.clone(),
                    source: Box::new(e),
                })?;
        }
        info!(count = domains.len(), "calibration bootstrap finished");
        Ok(domains.len())
    }

    fn domain_lock(&self, domain: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .write_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks
            .entry(sanitize_domain(domain))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Map a free-form domain to a safe file stem: anything outside
/// `[A-Za-z0-9_-]` becomes `_`.
fn sanitize_domain(domain: &str) -> String {
    let out: String = domain
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if out.is_empty() {
        "_".to_string()
    } else {
        out
    }
}
