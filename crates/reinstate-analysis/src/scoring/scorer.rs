//! Corrected and uncorrected reinstatement scoring.

use ndarray::ArrayView2;
use rand::Rng;
use reinstate_core::config::ScoringConfig;
use reinstate_core::types::{MemoryLabel, MemoryLabels, ScoringStrategy};

use super::NeighborhoodScores;
use crate::bootstrap::{bootstrap_summed_difference, BootstrapEstimate};
use crate::threshold::ThresholdedCorrelationSet;

/// Scoring parameters resolved from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScorerConfig {
    pub strategy: ScoringStrategy,
    pub n_perm: usize,
    pub threshold_sd: f64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self::from_config(&ScoringConfig::default())
    }
}

impl ScorerConfig {
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self {
            strategy: config.effective_strategy(),
            n_perm: config.effective_n_perm(),
            threshold_sd: config.effective_threshold_sd(),
        }
    }
}

/// Turns pre-rest and post-rest correlation matrices into bootstrap
/// z-scores.
///
/// Both matrices are `trials × rest samples`: entry `(i, t)` is the
/// correlation between trial `i`'s encoding pattern and rest sample `t`.
#[derive(Debug, Clone, Default)]
pub struct ReinstatementScorer {
    config: ScorerConfig,
}

impl ReinstatementScorer {
    pub fn new(config: ScorerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    pub fn score<R: Rng + ?Sized>(
        &self,
        pre: ArrayView2<'_, f64>,
        post: ArrayView2<'_, f64>,
        labels: &MemoryLabels,
        rng: &mut R,
    ) -> NeighborhoodScores {
        match self.config.strategy {
            ScoringStrategy::Corrected => self.score_corrected(pre, post, labels, rng),
            ScoringStrategy::Uncorrected => self.score_uncorrected(pre, post, labels, rng),
        }
    }

    /// Per label: threshold pre and post separately, bootstrap
    /// post survivors against pre survivors. Then contrast the remembered
    /// and forgotten distributions permutation by permutation.
    fn score_corrected<R: Rng + ?Sized>(
        &self,
        pre: ArrayView2<'_, f64>,
        post: ArrayView2<'_, f64>,
        labels: &MemoryLabels,
        rng: &mut R,
    ) -> NeighborhoodScores {
        let threshold_sd = self.config.threshold_sd;
        let n_perm = self.config.n_perm;
        let mut estimate = |label: MemoryLabel| -> BootstrapEstimate {
            let pre_set = ThresholdedCorrelationSet::build(pre, labels, label, threshold_sd);
            let post_set = ThresholdedCorrelationSet::build(post, labels, label, threshold_sd);
            tracing::trace!(
                label = label.name(),
                pre_survivors = pre_set.surviving_count(),
                post_survivors = post_set.surviving_count(),
                "thresholded correlations"
            );
            bootstrap_summed_difference(post_set.values(), pre_set.values(), n_perm, &mut *rng)
        };

        // Draw order is part of the result: forgotten, then remembered.
        let forgotten = estimate(MemoryLabel::Forgotten);
        let remembered = estimate(MemoryLabel::Remembered);
        let difference = remembered.contrast(&forgotten);

        NeighborhoodScores::Corrected {
            remembered: remembered.z,
            forgotten: forgotten.z,
            difference: difference.z,
        }
    }

    /// Per rest run: threshold each label, then bootstrap remembered
    /// survivors against forgotten survivors. No post-minus-pre contrast.
    fn score_uncorrected<R: Rng + ?Sized>(
        &self,
        pre: ArrayView2<'_, f64>,
        post: ArrayView2<'_, f64>,
        labels: &MemoryLabels,
        rng: &mut R,
    ) -> NeighborhoodScores {
        let threshold_sd = self.config.threshold_sd;
        let n_perm = self.config.n_perm;
        let mut estimate = |m: ArrayView2<'_, f64>| -> BootstrapEstimate {
            let remembered =
                ThresholdedCorrelationSet::build(m, labels, MemoryLabel::Remembered, threshold_sd);
            let forgotten =
                ThresholdedCorrelationSet::build(m, labels, MemoryLabel::Forgotten, threshold_sd);
            tracing::trace!(
                remembered_survivors = remembered.surviving_count(),
                forgotten_survivors = forgotten.surviving_count(),
                "thresholded correlations"
            );
            bootstrap_summed_difference(remembered.values(), forgotten.values(), n_perm, &mut *rng)
        };

        let difference_pre = estimate(pre);
        let difference_post = estimate(post);

        NeighborhoodScores::Uncorrected {
            difference_pre: difference_pre.z,
            difference_post: difference_post.z,
        }
    }
}
