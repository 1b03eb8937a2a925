//! Reinstatement scoring across both strategies.

use ndarray::{array, Array2};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use reinstate_analysis::scoring::{NeighborhoodScores, ReinstatementScorer, ScorerConfig};
use reinstate_analysis::threshold::{filter_by_label, ThresholdedCorrelationSet};
use reinstate_core::types::{MemoryLabel, MemoryLabels, OutcomeLabel, ScoringStrategy};

fn scorer(strategy: ScoringStrategy, n_perm: usize) -> ReinstatementScorer {
    ReinstatementScorer::new(ScorerConfig {
        strategy,
        n_perm,
        threshold_sd: 1.5,
    })
}

#[test]
fn test_one_remembered_one_forgotten_without_variance() {
    let labels = MemoryLabels::new(vec![MemoryLabel::Remembered, MemoryLabel::Forgotten]);
    let flat = Array2::from_elem((2, 6), 0.3);
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let scores = scorer(ScoringStrategy::Corrected, 1000).score(
        flat.view(),
        flat.view(),
        &labels,
        &mut rng,
    );

    let values = scores.values();
    assert_eq!(values.len(), 3);
    assert!(values.iter().any(|v| v.is_nan()));
}

#[test]
fn test_corrected_tracks_post_rest_increase_for_remembered() {
    // Remembered trial (row 0) correlates more with post rest than pre rest
    // at a handful of samples; forgotten trial (row 1) does not change.
    let pre = array![
        [0.0, 0.1, 0.0, 0.1, 0.0, 0.1, 0.0, 0.1, 0.0, 0.1, 0.0, 0.1],
        [0.0, 0.1, 0.0, 0.1, 0.0, 0.1, 0.0, 0.1, 0.0, 0.1, 0.0, 0.1],
    ];
    let post = array![
        [0.0, 0.1, 0.0, 0.9, 0.0, 0.1, 0.0, 0.7, 0.0, 0.1, 0.0, 0.1],
        [0.0, 0.1, 0.0, 0.1, 0.0, 0.1, 0.0, 0.1, 0.0, 0.1, 0.0, 0.1],
    ];
    let labels = MemoryLabels::new(vec![MemoryLabel::Remembered, MemoryLabel::Forgotten]);
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let scores =
        scorer(ScoringStrategy::Corrected, 500).score(pre.view(), post.view(), &labels, &mut rng);

    let remembered = scores.get(OutcomeLabel::Remembered).unwrap();
    assert!(remembered > 0.0, "remembered z = {remembered}");
}

#[test]
fn test_uncorrected_returns_two_scores() {
    let pre = array![
        [0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.9, 0.8, 0.85],
        [0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.3, 0.35],
        [0.2, 0.1, 0.2, 0.1, 0.2, 0.1, 0.2, 0.1, 0.2, 0.7],
    ];
    let post = array![
        [0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.3, 0.35],
        [0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.9, 0.8, 0.85],
        [0.2, 0.1, 0.2, 0.1, 0.2, 0.1, 0.2, 0.1, 0.2, 0.7],
    ];
    let labels = MemoryLabels::new(vec![
        MemoryLabel::Remembered,
        MemoryLabel::Forgotten,
        MemoryLabel::Remembered,
    ]);
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let scores =
        scorer(ScoringStrategy::Uncorrected, 200).score(pre.view(), post.view(), &labels, &mut rng);
    assert!(matches!(scores, NeighborhoodScores::Uncorrected { .. }));
    assert_eq!(scores.values().len(), 2);
    assert!(scores.values().iter().all(|v| v.is_finite()));
}

#[test]
fn test_uncorrected_thresholds_each_label_before_bootstrap() {
    // Each label keeps only its 0.9 peak, so remembered and forgotten sums
    // are equal in every permutation and the difference has no spread.
    let row = [0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.9];
    let m = Array2::from_shape_fn((2, row.len()), |(_, t)| row[t]);
    let labels = MemoryLabels::new(vec![MemoryLabel::Remembered, MemoryLabel::Forgotten]);
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let scores =
        scorer(ScoringStrategy::Uncorrected, 1000).score(m.view(), m.view(), &labels, &mut rng);

    let pre = scores.get(OutcomeLabel::DifferencePre).unwrap();
    let post = scores.get(OutcomeLabel::DifferencePost).unwrap();
    assert!(pre.is_nan(), "difference_pre = {pre}");
    assert!(post.is_nan(), "difference_post = {post}");
}

#[test]
fn test_unlabeled_trials_are_ignored_by_scoring() {
    let pre = array![[0.2, 0.4, 0.1], [0.3, 0.1, 0.5]];
    let post = array![[0.1, 0.3, 0.8], [0.2, 0.2, 0.4]];
    let with_unlabeled = array![[0.2, 0.4, 0.1], [0.3, 0.1, 0.5], [0.9, 0.9, 0.9]];
    let post_with_unlabeled = array![[0.1, 0.3, 0.8], [0.2, 0.2, 0.4], [0.9, 0.9, 0.9]];

    let labels = MemoryLabels::new(vec![MemoryLabel::Remembered, MemoryLabel::Forgotten]);
    let labels_unlabeled = MemoryLabels::from_optional(vec![
        Some(MemoryLabel::Remembered),
        Some(MemoryLabel::Forgotten),
        None,
    ]);

    let s = scorer(ScoringStrategy::Uncorrected, 100);
    let a = s.score(pre.view(), post.view(), &labels, &mut ChaCha8Rng::seed_from_u64(3));
    let b = s.score(
        with_unlabeled.view(),
        post_with_unlabeled.view(),
        &labels_unlabeled,
        &mut ChaCha8Rng::seed_from_u64(3),
    );
    assert_eq!(format!("{a:?}"), format!("{b:?}"));
}

#[test]
fn test_filter_then_threshold_is_monotone() {
    let m = array![
        [0.9, -0.2, 0.4, 0.1],
        [0.3, 0.8, -0.5, 0.0],
        [0.7, 0.6, 0.2, f64::NAN],
    ];
    let labels = MemoryLabels::new(vec![
        MemoryLabel::Remembered,
        MemoryLabel::Forgotten,
        MemoryLabel::Remembered,
    ]);
    for label in MemoryLabel::ALL {
        let filtered = filter_by_label(m.view(), &labels, label);
        let set = ThresholdedCorrelationSet::build(m.view(), &labels, label, 0.5);
        let total = m.iter().filter(|v| !v.is_nan()).count();
        assert_eq!(
            set.label_filtered_count(),
            filtered.iter().filter(|v| !v.is_nan()).count()
        );
        assert!(set.surviving_count() <= set.label_filtered_count());
        assert!(set.label_filtered_count() <= total);
        assert!(set.values().iter().all(|v| *v > set.cutoff()));
    }
}
