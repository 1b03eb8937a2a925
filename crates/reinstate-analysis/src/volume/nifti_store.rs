//! NIfTI-1 volume storage (`.nii` / `.nii.gz`).

use std::path::Path;

use nalgebra::Matrix4;
use ndarray::{Axis, Ix3, Ix4, IxDyn};
use nifti::writer::WriterOptions;
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};
use reinstate_core::errors::VolumeError;

use super::{scaling_affine, Volume, Volume3, Volume4};

/// Reads and writes volumes as NIfTI files on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct NiftiStore;

impl NiftiStore {
    fn read(path: &Path) -> Result<(ndarray::Array<f64, IxDyn>, Matrix4<f64>), VolumeError> {
        if !path.exists() {
            return Err(VolumeError::NotFound(path.to_path_buf()));
        }
        let decode = |message: String| VolumeError::Decode {
            path: path.to_path_buf(),
            message,
        };
        let obj = ReaderOptions::new()
            .read_file(path)
            .map_err(|e| decode(e.to_string()))?;
        let affine = header_affine(obj.header());
        let data = obj
            .into_volume()
            .into_ndarray::<f64>()
            .map_err(|e| decode(e.to_string()))?;
        tracing::debug!(path = %path.display(), shape = ?data.shape(), "volume loaded");
        Ok((data, affine))
    }
}

impl super::VolumeStore for NiftiStore {
    fn load_run(&self, path: &Path) -> Result<Volume4, VolumeError> {
        let (data, affine) = Self::read(path)?;
        let found = data.ndim();
        let data = data
            .into_dimensionality::<Ix4>()
            .map_err(|_| VolumeError::Dimensionality {
                path: path.to_path_buf(),
                expected: 4,
                found,
            })?;
        Ok(Volume::new(data, affine))
    }

    fn load_image(&self, path: &Path) -> Result<Volume3, VolumeError> {
        let (mut data, affine) = Self::read(path)?;
        // Single-volume 4-D images are accepted as 3-D.
        if data.ndim() == 4 && data.len_of(Axis(3)) == 1 {
            data = data.index_axis_move(Axis(3), 0);
        }
        let found = data.ndim();
        let data = data
            .into_dimensionality::<Ix3>()
            .map_err(|_| VolumeError::Dimensionality {
                path: path.to_path_buf(),
                expected: 3,
                found,
            })?;
        Ok(Volume::new(data, affine))
    }

    fn save_image(&self, volume: &Volume3, path: &Path) -> Result<(), VolumeError> {
        let header = reference_header(volume);
        WriterOptions::new(path)
            .reference_header(&header)
            .write_nifti(&volume.data)
            .map_err(|e| VolumeError::Write {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        tracing::debug!(path = %path.display(), "volume written");
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Voxel → world affine from a header: the sform rows when an sform is
/// set, otherwise a plain scaling by `pixdim`.
fn header_affine(header: &NiftiHeader) -> Matrix4<f64> {
    if header.sform_code > 0 {
        let row = |r: [f32; 4]| [r[0] as f64, r[1] as f64, r[2] as f64, r[3] as f64];
        let (x, y, z) = (row(header.srow_x), row(header.srow_y), row(header.srow_z));
        Matrix4::new(
            x[0], x[1], x[2], x[3], //
            y[0], y[1], y[2], y[3], //
            z[0], z[1], z[2], z[3], //
            0.0, 0.0, 0.0, 1.0,
        )
    } else {
        let pixdim = |i: usize| {
            let v = header.pixdim[i] as f64;
            if v > 0.0 {
                v
            } else {
                1.0
            }
        };
        scaling_affine([pixdim(1), pixdim(2), pixdim(3)])
    }
}

/// Header carrying the volume's affine as an sform, with matching pixdim.
fn reference_header(volume: &Volume3) -> NiftiHeader {
    let a = &volume.affine;
    let row = |r: usize| {
        [
            a[(r, 0)] as f32,
            a[(r, 1)] as f32,
            a[(r, 2)] as f32,
            a[(r, 3)] as f32,
        ]
    };
    let [vx, vy, vz] = volume.voxel_size();
    NiftiHeader {
        sform_code: 1,
        qform_code: 0,
        srow_x: row(0),
        srow_y: row(1),
        srow_z: row(2),
        pixdim: [1.0, vx as f32, vy as f32, vz as f32, 1.0, 1.0, 1.0, 1.0],
        ..NiftiHeader::default()
    }
}
