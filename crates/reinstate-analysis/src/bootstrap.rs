//! Bootstrap estimate of a summed difference.
//!
//! Each permutation resamples both collections with replacement (same
//! size as the original), sums each resample, and records
//! `sum(A*) - sum(B*)`. The z-score is the mean of that distribution over
//! its population standard deviation.

use rand::Rng;
use serde::Serialize;
use statrs::statistics::Statistics;

/// A bootstrap distribution and its z-score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BootstrapEstimate {
    /// `mean / population std` of `differences`; NaN when the std is zero.
    pub z: f64,
    /// One summed difference per permutation, in draw order.
    pub differences: Vec<f64>,
}

impl BootstrapEstimate {
    pub fn from_differences(differences: Vec<f64>) -> Self {
        Self {
            z: distribution_z(&differences),
            differences,
        }
    }

    pub fn n_perm(&self) -> usize {
        self.differences.len()
    }

    /// Element-wise `self - other`, re-scored. Both estimates must come
    /// from the same number of permutations.
    pub fn contrast(&self, other: &BootstrapEstimate) -> BootstrapEstimate {
        debug_assert_eq!(self.n_perm(), other.n_perm());
        let differences = self
            .differences
            .iter()
            .zip(&other.differences)
            .map(|(a, b)| a - b)
            .collect();
        Self::from_differences(differences)
    }
}

/// `mean / population std` of a distribution. Zero or undefined spread
/// gives NaN.
pub fn distribution_z(distribution: &[f64]) -> f64 {
    if distribution.is_empty() {
        tracing::trace!("empty bootstrap distribution");
        return f64::NAN;
    }
    let mean = distribution.mean();
    let std = distribution.population_std_dev();
    if std.is_finite() && std > 0.0 {
        mean / std
    } else {
        tracing::trace!(mean, std, "degenerate bootstrap distribution");
        f64::NAN
    }
}

/// Bootstrap the difference of resampled sums of `a` and `b`.
///
/// Within each permutation, the `a` draws happen before the `b` draws, so a
/// given generator state yields one exact distribution. An empty
/// collection sums to zero in every permutation. NaN values contribute
/// zero to a sum.
pub fn bootstrap_summed_difference<R: Rng + ?Sized>(
    a: &[f64],
    b: &[f64],
    n_perm: usize,
    rng: &mut R,
) -> BootstrapEstimate {
    let differences = (0..n_perm)
        .map(|_| {
            let sum_a = resampled_sum(a, rng);
            let sum_b = resampled_sum(b, rng);
            sum_a - sum_b
        })
        .collect();
    BootstrapEstimate::from_differences(differences)
}

fn resampled_sum<R: Rng + ?Sized>(values: &[f64], rng: &mut R) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    (0..values.len())
        .map(|_| values[rng.gen_range(0..values.len())])
        .filter(|v| !v.is_nan())
        .sum()
}
