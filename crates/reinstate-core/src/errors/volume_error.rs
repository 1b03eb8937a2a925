//! Volume storage and resampling errors.

use std::path::PathBuf;

use super::error_code::{self, ReinstateErrorCode};

/// Errors that can occur while loading, saving, or resampling volumes.
#[derive(Debug, thiserror::Error)]
pub enum VolumeError {
    #[error("Volume file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to decode volume {path}: {message}")]
    Decode { path: PathBuf, message: String },

    #[error("Failed to write volume {path}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("Volume {path} has {found} dimensions, expected {expected}")]
    Dimensionality {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("Shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("Affine transform is not invertible")]
    SingularAffine,
}

impl ReinstateErrorCode for VolumeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ShapeMismatch { .. } => error_code::SHAPE_MISMATCH,
            _ => error_code::VOLUME_ERROR,
        }
    }
}
