//! Label filtering and mean + k·sd thresholding of correlation matrices.

use ndarray::{Array2, ArrayView2};
use reinstate_core::types::{MemoryLabel, MemoryLabels};

use crate::stats::{nan_mean, nan_population_std};

/// Copy of a `trials × samples` correlation matrix with every row whose
/// trial does not carry `label` set to NaN. Unlabeled trials never match.
pub fn filter_by_label(
    correlations: ArrayView2<'_, f64>,
    labels: &MemoryLabels,
    label: MemoryLabel,
) -> Array2<f64> {
    let mut filtered = correlations.to_owned();
    for (trial, mut row) in filtered.outer_iter_mut().enumerate() {
        if !labels.matches(trial, label) {
            row.fill(f64::NAN);
        }
    }
    filtered
}

/// Cutoff `nan_mean + k · nan_std` over the non-NaN entries of `m`.
pub fn mean_sd_cutoff(m: ArrayView2<'_, f64>, sd_multiplier: f64) -> f64 {
    let mean = nan_mean(m.iter().copied());
    let std = nan_population_std(m.iter().copied());
    mean + sd_multiplier * std
}

/// The correlation values one label contributes to scoring.
///
/// Built in two steps: the label filter, then the strict `> cutoff`
/// threshold. Every surviving entry was present after the label filter,
/// and every entry present after the filter belongs to a labeled trial.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdedCorrelationSet {
    label: MemoryLabel,
    label_filtered_count: usize,
    cutoff: f64,
    values: Vec<f64>,
}

impl ThresholdedCorrelationSet {
    pub fn build(
        correlations: ArrayView2<'_, f64>,
        labels: &MemoryLabels,
        label: MemoryLabel,
        sd_multiplier: f64,
    ) -> Self {
        let filtered = filter_by_label(correlations, labels, label);
        let label_filtered_count = filtered.iter().filter(|v| !v.is_nan()).count();
        let cutoff = mean_sd_cutoff(filtered.view(), sd_multiplier);
        // NaN cutoff and NaN entries both compare false
        let values = filtered
            .iter()
            .copied()
            .filter(|&v| v > cutoff)
            .collect();
        Self {
            label,
            label_filtered_count,
            cutoff,
            values,
        }
    }

    pub fn label(&self) -> MemoryLabel {
        self.label
    }

    /// Non-NaN entries remaining after the label filter.
    pub fn label_filtered_count(&self) -> usize {
        self.label_filtered_count
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn surviving_count(&self) -> usize {
        self.values.len()
    }

    /// Surviving correlation values, row-major.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
