//! Searchlight driver errors.

use super::error_code::{self, ReinstateErrorCode};
use super::KernelError;

/// Errors that can occur while distributing, running, or collecting a searchlight.
#[derive(Debug, thiserror::Error)]
pub enum SearchlightError {
    #[error("Searchlight run requested before data was distributed")]
    NotDistributed,

    #[error("Searchlight run requested before the shared context was broadcast")]
    NotBroadcast,

    #[error("Context already broadcast; broadcast state is immutable")]
    AlreadyBroadcast,

    #[error("No run volumes supplied to distribute")]
    NoRuns,

    #[error("Run {run} has spatial shape {found:?}, mask has {expected:?}")]
    ShapeMismatch {
        run: usize,
        expected: [usize; 3],
        found: [usize; 3],
    },

    #[error("Invalid searchlight parameter {field}: {message}")]
    InvalidParameter { field: &'static str, message: String },

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error("Kernel failed at neighborhood {center:?}: {source}")]
    Kernel {
        center: [usize; 3],
        #[source]
        source: KernelError,
    },
}

impl ReinstateErrorCode for SearchlightError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Kernel { source, .. } => source.error_code(),
            Self::ShapeMismatch { .. } => error_code::SHAPE_MISMATCH,
            _ => error_code::SEARCHLIGHT_ERROR,
        }
    }
}
