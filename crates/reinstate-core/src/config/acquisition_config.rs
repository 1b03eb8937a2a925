//! Acquisition configuration.

use serde::{Deserialize, Serialize};

/// Scanner acquisition parameters and run preprocessing.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AcquisitionConfig {
    /// Repetition time, in the units of the trial timing files. Default: 2.0.
    /// Every time-to-sample conversion reads this one value.
    pub tr: Option<f64>,
    /// Threshold used to binarize the resampled brain mask. Default: 0.1.
    pub mask_threshold: Option<f64>,
    /// Z-score each voxel over time when a run is loaded. Default: true.
    pub zscore_runs: Option<bool>,
}

impl AcquisitionConfig {
    /// Returns the effective TR, defaulting to 2.0.
    pub fn effective_tr(&self) -> f64 {
        self.tr.unwrap_or(2.0)
    }

    /// Returns the effective mask threshold, defaulting to 0.1.
    pub fn effective_mask_threshold(&self) -> f64 {
        self.mask_threshold.unwrap_or(0.1)
    }

    pub fn effective_zscore_runs(&self) -> bool {
        self.zscore_runs.unwrap_or(true)
    }

    pub(crate) fn merge_from(&mut self, other: &Self) {
        if other.tr.is_some() {
            self.tr = other.tr;
        }
        if other.mask_threshold.is_some() {
            self.mask_threshold = other.mask_threshold;
        }
        if other.zscore_runs.is_some() {
            self.zscore_runs = other.zscore_runs;
        }
    }
}
