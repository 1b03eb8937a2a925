//! Reassembly of per-neighborhood outcomes into one volume per outcome label.

use ndarray::Array3;
use reinstate_core::types::{OutcomeLabel, ScoringStrategy};
use serde::Serialize;

use crate::scoring::NeighborhoodOutcome;

/// One persisted statistic over the native voxel grid.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeVolume {
    pub label: OutcomeLabel,
    pub data: Array3<f64>,
}

/// How many centers were scored or skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeTally {
    pub centers: usize,
    pub scored: usize,
    pub skipped: usize,
}

/// Count the outcomes in a searchlight result grid.
pub fn tally(results: &Array3<Option<NeighborhoodOutcome>>) -> OutcomeTally {
    results.iter().flatten().fold(OutcomeTally::default(), |mut t, outcome| {
        t.centers += 1;
        if outcome.is_skipped() {
            t.skipped += 1;
        } else {
            t.scored += 1;
        }
        t
    })
}

/// Split a result grid into one volume per outcome label of `strategy`.
///
/// Non-centers, skipped neighborhoods, and NaN scores all become 0.
pub fn assemble_outcome_volumes(
    results: &Array3<Option<NeighborhoodOutcome>>,
    strategy: ScoringStrategy,
) -> Vec<OutcomeVolume> {
    strategy
        .outcome_labels()
        .iter()
        .map(|&label| OutcomeVolume {
            label,
            data: results.map(|result| {
                result
                    .as_ref()
                    .and_then(|outcome| outcome.scores())
                    .and_then(|scores| scores.get(label))
                    .filter(|v| v.is_finite())
                    .unwrap_or(0.0)
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::NeighborhoodScores;

    #[test]
    fn test_missing_skipped_and_nan_become_zero() {
        let mut results = Array3::from_shape_simple_fn((2, 1, 2), || None);
        results[[0, 0, 0]] = Some(NeighborhoodOutcome::Skipped);
        results[[0, 0, 1]] = Some(NeighborhoodOutcome::Scored(NeighborhoodScores::Corrected {
            remembered: 1.5,
            forgotten: f64::NAN,
            difference: -0.5,
        }));

        let volumes = assemble_outcome_volumes(&results, ScoringStrategy::Corrected);
        let labels: Vec<OutcomeLabel> = volumes.iter().map(|v| v.label).collect();
        assert_eq!(
            labels,
            vec![OutcomeLabel::Remembered, OutcomeLabel::Forgotten, OutcomeLabel::Difference]
        );
        assert_eq!(volumes[0].data[[0, 0, 1]], 1.5);
        assert_eq!(volumes[1].data[[0, 0, 1]], 0.0);
        assert_eq!(volumes[2].data[[0, 0, 1]], -0.5);
        for volume in &volumes {
            assert_eq!(volume.data[[0, 0, 0]], 0.0);
            assert_eq!(volume.data[[1, 0, 0]], 0.0);
        }

        let t = tally(&results);
        assert_eq!(t, OutcomeTally { centers: 2, scored: 1, skipped: 1 });
    }

    #[test]
    fn test_uncorrected_volumes() {
        let mut results = Array3::from_shape_simple_fn((1, 1, 1), || None);
        results[[0, 0, 0]] = Some(NeighborhoodOutcome::Scored(NeighborhoodScores::Uncorrected {
            difference_pre: 2.0,
            difference_post: -1.0,
        }));
        let volumes = assemble_outcome_volumes(&results, ScoringStrategy::Uncorrected);
        assert_eq!(volumes.len(), 2);
        assert_eq!(volumes[0].label, OutcomeLabel::DifferencePre);
        assert_eq!(volumes[0].data[[0, 0, 0]], 2.0);
        assert_eq!(volumes[1].data[[0, 0, 0]], -1.0);
    }
}
