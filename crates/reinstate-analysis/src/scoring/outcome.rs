//! Per-neighborhood scoring results.

use reinstate_core::types::{OutcomeLabel, ScoringStrategy};
use serde::Serialize;

/// Bootstrap z-scores for one neighborhood. NaN marks an undefined score
/// (zero-variance distribution).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "strategy", rename_all = "lowercase")]
pub enum NeighborhoodScores {
    Corrected {
        remembered: f64,
        forgotten: f64,
        difference: f64,
    },
    Uncorrected {
        difference_pre: f64,
        difference_post: f64,
    },
}

impl NeighborhoodScores {
    pub fn strategy(&self) -> ScoringStrategy {
        match self {
            Self::Corrected { .. } => ScoringStrategy::Corrected,
            Self::Uncorrected { .. } => ScoringStrategy::Uncorrected,
        }
    }

    /// Score for `label`, or `None` if this strategy does not produce it.
    pub fn get(&self, label: OutcomeLabel) -> Option<f64> {
        match (self, label) {
            (Self::Corrected { remembered, .. }, OutcomeLabel::Remembered) => Some(*remembered),
            (Self::Corrected { forgotten, .. }, OutcomeLabel::Forgotten) => Some(*forgotten),
            (Self::Corrected { difference, .. }, OutcomeLabel::Difference) => Some(*difference),
            (Self::Uncorrected { difference_pre, .. }, OutcomeLabel::DifferencePre) => {
                Some(*difference_pre)
            }
            (Self::Uncorrected { difference_post, .. }, OutcomeLabel::DifferencePost) => {
                Some(*difference_post)
            }
            _ => None,
        }
    }

    /// Scores in the strategy's outcome-label order.
    pub fn values(&self) -> Vec<f64> {
        self.strategy()
            .outcome_labels()
            .iter()
            .filter_map(|label| self.get(*label))
            .collect()
    }
}

/// What the kernel produced for one searchlight center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum NeighborhoodOutcome {
    /// Fewer in-mask voxels than the minimum; no score.
    Skipped,
    Scored(NeighborhoodScores),
}

impl NeighborhoodOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    pub fn scores(&self) -> Option<&NeighborhoodScores> {
        match self {
            Self::Skipped => None,
            Self::Scored(scores) => Some(scores),
        }
    }
}
