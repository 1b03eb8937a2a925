//! Trial segmentation: continuous voxel time series → one pattern per trial.

use ndarray::{s, Array2, ArrayView2};
use reinstate_core::errors::InputError;
use reinstate_core::types::TrialTiming;

use crate::stats::nan_mean;

/// Averages the samples covered by each trial.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialSegmenter {
    tr: f64,
}

impl TrialSegmenter {
    /// `tr` is the sampling interval, in the units of the trial timing.
    pub fn new(tr: f64) -> Self {
        Self { tr }
    }

    pub fn tr(&self) -> f64 {
        self.tr
    }

    /// Check that every trial starts inside a series of `n_samples`.
    /// `source_name` names the timing table in the diagnostic.
    ///
    /// Trial ends past the series are clamped by [`segment`](Self::segment),
    /// but a trial that starts past the end has no data at all and is a
    /// malformed timing table.
    pub fn check_spans(
        &self,
        source_name: &str,
        timing: &TrialTiming,
        n_samples: usize,
    ) -> Result<(), InputError> {
        for (i, trial) in timing.iter().enumerate() {
            let (start, _) = trial.sample_span(self.tr);
            if start >= n_samples {
                return Err(InputError::MalformedTiming {
                    source_name: source_name.to_string(),
                    trial: i,
                    message: format!(
                        "trial starts at sample {start} but the run has {n_samples} samples"
                    ),
                });
            }
        }
        Ok(())
    }

    /// Segment a `voxels × samples` series into a `trials × voxels` matrix.
    ///
    /// Row `i` holds, per voxel, the mean over samples
    /// `[floor(onset/tr), floor((onset+duration)/tr))`. A trial covering no
    /// samples yields a NaN row; NaN samples are ignored in the mean.
    pub fn segment(
        &self,
        series: ArrayView2<'_, f64>,
        timing: &TrialTiming,
    ) -> Result<Array2<f64>, InputError> {
        let (n_voxels, n_samples) = series.dim();
        self.check_spans("trial timing", timing, n_samples)?;

        let mut patterns = Array2::from_elem((timing.len(), n_voxels), f64::NAN);
        for (i, trial) in timing.iter().enumerate() {
            let (start, end) = trial.sample_span(self.tr);
            let end = end.min(n_samples);
            if start >= end {
                tracing::debug!(trial = i, start, end, "trial covers no samples");
                continue;
            }
            let window = series.slice(s![.., start..end]);
            for (v, samples) in window.outer_iter().enumerate() {
                patterns[[i, v]] = nan_mean(samples.iter().copied());
            }
        }
        Ok(patterns)
    }
}
