//! Resampling 3-D volumes between voxel grids.

use nalgebra::{Matrix4, Vector4};
use ndarray::Array3;
use reinstate_core::errors::VolumeError;

use super::Volume3;

/// Maps a volume onto another voxel grid, given as affine + shape.
pub trait Resampler: Send + Sync {
    fn resample(
        &self,
        volume: &Volume3,
        target_affine: &Matrix4<f64>,
        target_shape: [usize; 3],
    ) -> Result<Volume3, VolumeError>;
}

/// Nearest-neighbour resampling (interpolation order 0). Target voxels
/// that fall outside the source grid are 0. Labels and binary masks keep
/// their values exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighbourResampler;

impl Resampler for NearestNeighbourResampler {
    fn resample(
        &self,
        volume: &Volume3,
        target_affine: &Matrix4<f64>,
        target_shape: [usize; 3],
    ) -> Result<Volume3, VolumeError> {
        let world_to_source = volume
            .affine
            .try_inverse()
            .ok_or(VolumeError::SingularAffine)?;
        let target_to_source = world_to_source * target_affine;
        let (sx, sy, sz) = volume.data.dim();

        let data = Array3::from_shape_fn(
            (target_shape[0], target_shape[1], target_shape[2]),
            |(i, j, k)| {
                let p = target_to_source * Vector4::new(i as f64, j as f64, k as f64, 1.0);
                match (
                    nearest_index(p[0], sx),
                    nearest_index(p[1], sy),
                    nearest_index(p[2], sz),
                ) {
                    (Some(x), Some(y), Some(z)) => volume.data[[x, y, z]],
                    _ => 0.0,
                }
            },
        );
        Ok(Volume3::new(data, *target_affine))
    }
}

fn nearest_index(coordinate: f64, len: usize) -> Option<usize> {
    let rounded = coordinate.round();
    if rounded >= 0.0 && rounded < len as f64 {
        Some(rounded as usize)
    } else {
        None
    }
}
