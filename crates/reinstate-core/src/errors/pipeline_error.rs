//! Pipeline errors.

use super::error_code::ReinstateErrorCode;
use super::{ConfigError, InputError, SearchlightError, VolumeError};

/// Errors that can occur during a subject run.
/// Aggregates subsystem errors via `From` conversions. There is no partial
/// result: any error aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Volume error: {0}")]
    Volume(#[from] VolumeError),

    #[error("Searchlight error: {0}")]
    Searchlight(#[from] SearchlightError),
}

impl ReinstateErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Input(e) => e.error_code(),
            Self::Volume(e) => e.error_code(),
            Self::Searchlight(e) => e.error_code(),
        }
    }
}
