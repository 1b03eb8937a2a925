//! The per-neighborhood reinstatement kernel.
//!
//! For one neighborhood: keep in-mask voxels, skip if there are too few,
//! segment the memory run into trial patterns, correlate the patterns with
//! every pre-rest and post-rest sample, and score.

use ndarray::{s, Array2, ArrayView3, ArrayView4, Axis};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use reinstate_core::config::ReinstateConfig;
use reinstate_core::errors::{InputError, KernelError};
use reinstate_core::types::{MemoryLabels, RunKind, TrialTiming};

use crate::scoring::{NeighborhoodOutcome, ReinstatementScorer, ScorerConfig};
use crate::searchlight::{Neighborhood, SearchlightKernel};
use crate::segmentation::TrialSegmenter;
use crate::stats::correlate_columns;

/// Read-only state broadcast to every neighborhood: the encoding trial
/// timing and the memory label of each trial.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchlightContext {
    timing: TrialTiming,
    labels: MemoryLabels,
}

impl SearchlightContext {
    /// Timing and labels must describe the same trials.
    pub fn new(timing: TrialTiming, labels: MemoryLabels) -> Result<Self, InputError> {
        Self::from_sources(timing, "trial timing", labels, "memory labels")
    }

    /// As [`new`](Self::new), naming where the timing and labels were read
    /// from in the mismatch diagnostic.
    pub fn from_sources(
        timing: TrialTiming,
        timing_source: &str,
        labels: MemoryLabels,
        labels_source: &str,
    ) -> Result<Self, InputError> {
        if timing.len() != labels.len() {
            return Err(InputError::TrialCountMismatch {
                timing: timing.len(),
                labels: labels.len(),
                timing_source: timing_source.to_string(),
                labels_source: labels_source.to_string(),
            });
        }
        Ok(Self { timing, labels })
    }

    pub fn timing(&self) -> &TrialTiming {
        &self.timing
    }

    pub fn labels(&self) -> &MemoryLabels {
        &self.labels
    }
}

/// Adapts segmentation and scoring to the searchlight kernel contract.
#[derive(Debug, Clone)]
pub struct NeighborhoodKernel {
    segmenter: TrialSegmenter,
    scorer: ReinstatementScorer,
    min_voxels: usize,
    seed: u64,
}

impl NeighborhoodKernel {
    pub fn new(
        segmenter: TrialSegmenter,
        scorer: ReinstatementScorer,
        min_voxels: usize,
        seed: u64,
    ) -> Self {
        Self {
            segmenter,
            scorer,
            min_voxels,
            seed,
        }
    }

    pub fn from_config(config: &ReinstateConfig) -> Self {
        Self::new(
            TrialSegmenter::new(config.acquisition.effective_tr()),
            ReinstatementScorer::new(ScorerConfig::from_config(&config.scoring)),
            config.searchlight.effective_min_voxels(),
            config.scoring.effective_seed(),
        )
    }

    pub fn min_voxels(&self) -> usize {
        self.min_voxels
    }

    /// Generator for the neighborhood at `linear_index`: the configured
    /// seed, on a stream of its own. Results do not depend on which worker
    /// evaluates a neighborhood or in what order.
    pub fn rng_for(&self, linear_index: usize) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        rng.set_stream(linear_index as u64);
        rng
    }

    /// Score one neighborhood.
    ///
    /// `runs` are the memory, pre-rest, and post-rest windows in that order,
    /// each sharing `mask`'s spatial shape.
    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        runs: &[ArrayView4<'_, f64>],
        mask: ArrayView3<'_, bool>,
        context: &SearchlightContext,
        rng: &mut R,
    ) -> Result<NeighborhoodOutcome, KernelError> {
        if runs.len() != RunKind::ALL.len() {
            return Err(KernelError::RunCount {
                expected: RunKind::ALL.len(),
                found: runs.len(),
            });
        }
        let (mx, my, mz) = mask.dim();
        for kind in RunKind::ALL {
            let run = &runs[kind.index()];
            let found = [
                run.len_of(Axis(0)),
                run.len_of(Axis(1)),
                run.len_of(Axis(2)),
            ];
            if found != [mx, my, mz] {
                return Err(KernelError::RunShape {
                    run: kind.name(),
                    expected: [mx, my, mz],
                    found,
                });
            }
        }

        let voxels = mask.iter().filter(|m| **m).count();
        if voxels < self.min_voxels {
            tracing::trace!(voxels, min_voxels = self.min_voxels, "neighborhood skipped");
            return Ok(NeighborhoodOutcome::Skipped);
        }

        let memory = masked_series(runs[RunKind::Memory.index()], mask, voxels);
        let rest_pre = masked_series(runs[RunKind::RestPre.index()], mask, voxels);
        let rest_post = masked_series(runs[RunKind::RestPost.index()], mask, voxels);

        // trials × voxels
        let patterns = self.segmenter.segment(memory.view(), context.timing())?;

        // trials × rest samples
        let pre = correlate_columns(patterns.t(), rest_pre.view());
        let post = correlate_columns(patterns.t(), rest_post.view());

        let scores = self
            .scorer
            .score(pre.view(), post.view(), context.labels(), rng);
        Ok(NeighborhoodOutcome::Scored(scores))
    }
}

impl SearchlightKernel for NeighborhoodKernel {
    type Context = SearchlightContext;
    type Output = NeighborhoodOutcome;

    fn apply(
        &self,
        neighborhood: &Neighborhood<'_>,
        context: &SearchlightContext,
    ) -> Result<NeighborhoodOutcome, KernelError> {
        let mut rng = self.rng_for(neighborhood.linear_index());
        self.evaluate(neighborhood.runs(), neighborhood.mask(), context, &mut rng)
    }
}

/// In-mask voxels of a `x × y × z × samples` window as a
/// `voxels × samples` matrix, voxels in C order.
fn masked_series(run: ArrayView4<'_, f64>, mask: ArrayView3<'_, bool>, voxels: usize) -> Array2<f64> {
    let mut series = Array2::zeros((voxels, run.len_of(Axis(3))));
    let in_mask = mask
        .indexed_iter()
        .filter(|(_, &inside)| inside)
        .map(|(idx, _)| idx);
    for (row, (i, j, k)) in in_mask.enumerate() {
        series.row_mut(row).assign(&run.slice(s![i, j, k, ..]));
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array3, Array4};
    use reinstate_core::types::MemoryLabel;

    use crate::scoring::NeighborhoodScores;

    fn context(n_trials: usize) -> SearchlightContext {
        let pairs: Vec<(f64, f64)> = (0..n_trials).map(|i| (i as f64 * 4.0, 4.0)).collect();
        let labels = (0..n_trials)
            .map(|i| {
                if i % 2 == 0 {
                    MemoryLabel::Remembered
                } else {
                    MemoryLabel::Forgotten
                }
            })
            .collect();
        SearchlightContext::new(
            TrialTiming::from_pairs("t", &pairs).unwrap(),
            MemoryLabels::new(labels),
        )
        .unwrap()
    }

    fn kernel() -> NeighborhoodKernel {
        NeighborhoodKernel::new(
            TrialSegmenter::new(2.0),
            ReinstatementScorer::new(ScorerConfig {
                n_perm: 20,
                ..ScorerConfig::default()
            }),
            50,
            0,
        )
    }

    fn runs(shape: (usize, usize, usize), samples: usize) -> Vec<Array4<f64>> {
        (0..3)
            .map(|r| {
                Array4::from_shape_fn((shape.0, shape.1, shape.2, samples), |(i, j, k, t)| {
                    ((i * 7 + j * 3 + k + t * (r + 1)) % 11) as f64
                })
            })
            .collect()
    }

    #[test]
    fn test_context_rejects_count_mismatch() {
        let timing = TrialTiming::from_pairs("t", &[(0.0, 2.0)]).unwrap();
        let labels = MemoryLabels::new(vec![MemoryLabel::Remembered, MemoryLabel::Forgotten]);
        assert!(matches!(
            SearchlightContext::new(timing, labels),
            Err(InputError::TrialCountMismatch { timing: 1, labels: 2, .. })
        ));
    }

    #[test]
    fn test_skips_below_min_voxels() {
        let runs = runs((7, 7, 7), 8);
        let views: Vec<_> = runs.iter().map(|r| r.view()).collect();
        let mut mask = Array3::from_elem((7, 7, 7), false);
        for (n, m) in mask.iter_mut().enumerate() {
            *m = n < 49;
        }
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let outcome = kernel()
            .evaluate(&views, mask.view(), &context(2), &mut rng)
            .unwrap();
        assert_eq!(outcome, NeighborhoodOutcome::Skipped);
    }

    #[test]
    fn test_scores_at_min_voxels() {
        let runs = runs((7, 7, 7), 8);
        let views: Vec<_> = runs.iter().map(|r| r.view()).collect();
        let mut mask = Array3::from_elem((7, 7, 7), false);
        for (n, m) in mask.iter_mut().enumerate() {
            *m = n < 50;
        }
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let outcome = kernel()
            .evaluate(&views, mask.view(), &context(2), &mut rng)
            .unwrap();
        assert!(matches!(
            outcome,
            NeighborhoodOutcome::Scored(NeighborhoodScores::Corrected { .. })
        ));
    }

    #[test]
    fn test_wrong_run_count_is_an_error() {
        let runs = runs((3, 3, 3), 4);
        let views: Vec<_> = runs.iter().take(2).map(|r| r.view()).collect();
        let mask = Array3::from_elem((3, 3, 3), true);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = kernel()
            .evaluate(&views, mask.view(), &context(1), &mut rng)
            .unwrap_err();
        assert!(matches!(err, KernelError::RunCount { expected: 3, found: 2 }));
    }

    #[test]
    fn test_masked_series_uses_c_order() {
        let run = Array4::from_shape_fn((2, 2, 1, 1), |(i, j, _, _)| (i * 2 + j) as f64);
        let mask = Array3::from_elem((2, 2, 1), true);
        let series = masked_series(run.view(), mask.view(), 4);
        assert_eq!(series.column(0).to_vec(), vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_rng_streams_differ_per_neighborhood() {
        let k = kernel();
        let a: u64 = k.rng_for(1).gen();
        let b: u64 = k.rng_for(2).gen();
        let a_again: u64 = k.rng_for(1).gen();
        assert_ne!(a, b);
        assert_eq!(a, a_again);
    }
}
