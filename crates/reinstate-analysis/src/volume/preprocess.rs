//! Run preprocessing applied at load time.

use ndarray::{Array3, Array4, ArrayView3, Axis};

use crate::stats::{nan_mean, nan_population_std};

/// Z-score every voxel's time series in place (population std).
/// A voxel with zero or undefined variance becomes all zeros.
pub fn zscore_over_time(data: &mut Array4<f64>) {
    for mut lane in data.lanes_mut(Axis(3)) {
        let mean = nan_mean(lane.iter().copied());
        let std = nan_population_std(lane.iter().copied());
        if std.is_finite() && std > 0.0 {
            lane.mapv_inplace(|v| (v - mean) / std);
        } else {
            lane.fill(0.0);
        }
    }
}

/// Voxels at or above `threshold` are inside the mask.
pub fn binarize(data: ArrayView3<'_, f64>, threshold: f64) -> Array3<bool> {
    data.mapv(|v| v >= threshold)
}
