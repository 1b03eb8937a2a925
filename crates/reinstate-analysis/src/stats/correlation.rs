//! Pearson correlation between the columns of two matrices.

use ndarray::{Array2, ArrayView2, Axis};

/// Correlate every column of `a` with every column of `b`.
///
/// Both inputs are `features × samples` with the same number of rows.
/// Entry `(i, j)` of the `a_samples × b_samples` result is the Pearson
/// correlation of `a[.., i]` with `b[.., j]`. A column containing NaN, or
/// with zero variance, correlates as NaN with everything. Finite results
/// are clamped to `[-1, 1]`.
///
/// # Panics
///
/// Panics if the row counts differ.
pub fn correlate_columns(a: ArrayView2<'_, f64>, b: ArrayView2<'_, f64>) -> Array2<f64> {
    assert_eq!(
        a.nrows(),
        b.nrows(),
        "correlated matrices must share their feature axis"
    );
    let a_unit = standardize_columns(a);
    let b_unit = standardize_columns(b);
    let mut r = a_unit.t().dot(&b_unit);
    r.mapv_inplace(|v| if v.is_finite() { v.clamp(-1.0, 1.0) } else { f64::NAN });
    r
}

/// Center each column and scale it to unit Euclidean norm. Degenerate
/// columns become all-NaN so every correlation they take part in is NaN.
fn standardize_columns(m: ArrayView2<'_, f64>) -> Array2<f64> {
    let mut out = m.to_owned();
    let n = m.nrows() as f64;
    for mut column in out.axis_iter_mut(Axis(1)) {
        let mean = column.sum() / n;
        column.mapv_inplace(|v| v - mean);
        let norm = column.dot(&column).sqrt();
        if norm.is_finite() && norm > 0.0 {
            column.mapv_inplace(|v| v / norm);
        } else {
            column.fill(f64::NAN);
        }
    }
    out
}
