//! Per-subject input errors. All of these are fatal for a run.

use std::path::PathBuf;

use super::error_code::{self, ReinstateErrorCode};

/// Errors raised while resolving or parsing a subject's timing and label inputs.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Missing input file for {subject}: {path}")]
    MissingInputFile { subject: String, path: PathBuf },

    #[error("Failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Malformed trial timing ({source_name}, trial {trial}): {message}")]
    MalformedTiming {
        source_name: String,
        trial: usize,
        message: String,
    },

    #[error("Malformed memory labels ({source_name}, row {row}): {message}")]
    MalformedLabels {
        source_name: String,
        row: usize,
        message: String,
    },

    #[error("Memory label column '{column}' not found in {path}")]
    MissingLabelColumn { column: String, path: PathBuf },

    #[error(
        "Trial count mismatch: {timing} timed trials in {timing_source} but {labels} memory labels in {labels_source}"
    )]
    TrialCountMismatch {
        timing: usize,
        labels: usize,
        timing_source: String,
        labels_source: String,
    },

    #[error("Unsupported analysis type '{0}': expected trialwise_<memory column>")]
    UnsupportedAnalysis(String),

    #[error("Invalid subject identifier '{0}'")]
    InvalidSubject(String),
}

impl ReinstateErrorCode for InputError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingInputFile { .. } => error_code::MISSING_INPUT_FILE,
            Self::MalformedTiming { .. } => error_code::MALFORMED_TIMING,
            Self::MalformedLabels { .. }
            | Self::MissingLabelColumn { .. }
            | Self::TrialCountMismatch { .. } => error_code::MALFORMED_LABELS,
            Self::Read { .. } | Self::UnsupportedAnalysis(_) | Self::InvalidSubject(_) => {
                error_code::INPUT_ERROR
            }
        }
    }
}
