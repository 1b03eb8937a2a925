//! Scoring configuration.

use serde::{Deserialize, Serialize};

use crate::types::ScoringStrategy;

/// Bootstrap and thresholding parameters.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScoringConfig {
    /// Corrected (default) or uncorrected scoring.
    pub strategy: Option<ScoringStrategy>,
    /// Bootstrap iterations. Default: 1000.
    pub n_perm: Option<usize>,
    /// Seed for the bootstrap generator. Default: 0.
    pub seed: Option<u64>,
    /// Correlations must exceed mean + `threshold_sd` * stddev. Default: 1.5.
    pub threshold_sd: Option<f64>,
}

impl ScoringConfig {
    pub fn effective_strategy(&self) -> ScoringStrategy {
        self.strategy.unwrap_or_default()
    }

    pub fn effective_n_perm(&self) -> usize {
        self.n_perm.unwrap_or(1000)
    }

    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or(0)
    }

    pub fn effective_threshold_sd(&self) -> f64 {
        self.threshold_sd.unwrap_or(1.5)
    }

    pub(crate) fn merge_from(&mut self, other: &Self) {
        if other.strategy.is_some() {
            self.strategy = other.strategy;
        }
        if other.n_perm.is_some() {
            self.n_perm = other.n_perm;
        }
        if other.seed.is_some() {
            self.seed = other.seed;
        }
        if other.threshold_sd.is_some() {
            self.threshold_sd = other.threshold_sd;
        }
    }
}
