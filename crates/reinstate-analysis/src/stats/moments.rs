//! NaN-aware summary statistics.
//!
//! NaN entries are ignored rather than propagated. An input with no
//! non-NaN values yields NaN. Standard deviations are population
//! (divide by `n`) throughout.

use statrs::statistics::Statistics;

/// Values that are not NaN, in input order.
pub fn finite_values<I>(values: I) -> Vec<f64>
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().filter(|v| !v.is_nan()).collect()
}

/// Mean of the non-NaN values.
pub fn nan_mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    finite_values(values).mean()
}

/// Population standard deviation of the non-NaN values.
pub fn nan_population_std<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    finite_values(values).population_std_dev()
}
