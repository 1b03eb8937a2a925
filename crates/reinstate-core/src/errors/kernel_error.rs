//! Neighborhood kernel errors.

use super::error_code::{self, ReinstateErrorCode};
use super::InputError;

/// Errors raised inside a single neighborhood kernel invocation.
/// Any of these aborts the whole searchlight run.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    #[error("Expected {expected} run blocks, received {found}")]
    RunCount { expected: usize, found: usize },

    #[error("Run '{run}' block has spatial shape {found:?}, mask has {expected:?}")]
    RunShape {
        run: &'static str,
        expected: [usize; 3],
        found: [usize; 3],
    },

    #[error("Trial segmentation failed: {0}")]
    Segmentation(#[from] InputError),
}

impl ReinstateErrorCode for KernelError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Segmentation(e) => e.error_code(),
            _ => error_code::KERNEL_ERROR,
        }
    }
}
