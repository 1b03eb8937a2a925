//! Spatial volumes: in-memory representation, storage, resampling, and
//! run preprocessing.

pub mod nifti_store;
pub mod preprocess;
pub mod resample;
pub mod store;

use nalgebra::{Matrix4, Vector4};
use ndarray::{Array, Dimension, Ix3, Ix4};

pub use nifti_store::NiftiStore;
pub use preprocess::{binarize, zscore_over_time};
pub use resample::{NearestNeighbourResampler, Resampler};
pub use store::{InMemoryVolumeStore, VolumeStore};

/// Voxel data plus the voxel → world (mm) affine.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume<D: Dimension> {
    pub data: Array<f64, D>,
    pub affine: Matrix4<f64>,
}

/// A single 3-D image (mask, result map).
pub type Volume3 = Volume<Ix3>;
/// A run: `x × y × z × samples`.
pub type Volume4 = Volume<Ix4>;

impl<D: Dimension> Volume<D> {
    pub fn new(data: Array<f64, D>, affine: Matrix4<f64>) -> Self {
        Self { data, affine }
    }

    /// Spatial extent (the first three axes).
    pub fn spatial_shape(&self) -> [usize; 3] {
        let shape = self.data.shape();
        [shape[0], shape[1], shape[2]]
    }

    /// Voxel edge lengths: norms of the affine's first three columns.
    pub fn voxel_size(&self) -> [f64; 3] {
        voxel_size(&self.affine)
    }
}

/// Voxel edge lengths encoded in an affine.
pub fn voxel_size(affine: &Matrix4<f64>) -> [f64; 3] {
    let column = |c: usize| {
        let v = affine.column(c);
        (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
    };
    [column(0), column(1), column(2)]
}

/// Diagonal affine with the given voxel size and no translation.
pub fn scaling_affine(voxel_size: [f64; 3]) -> Matrix4<f64> {
    Matrix4::from_diagonal(&Vector4::new(voxel_size[0], voxel_size[1], voxel_size[2], 1.0))
}
