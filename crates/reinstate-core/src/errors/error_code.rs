//! ReinstateErrorCode trait: stable string codes for every error enum.

/// Every error enum implements this to expose a machine-readable code,
/// used in the CLI exit diagnostics and in structured log fields.
pub trait ReinstateErrorCode {
    /// Returns the error code string (e.g., "MALFORMED_TIMING").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted diagnostic: `[ERROR_CODE] message`.
    fn diagnostic(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const MISSING_INPUT_FILE: &str = "MISSING_INPUT_FILE";
pub const MALFORMED_TIMING: &str = "MALFORMED_TIMING";
pub const MALFORMED_LABELS: &str = "MALFORMED_LABELS";
pub const INPUT_ERROR: &str = "INPUT_ERROR";
pub const VOLUME_ERROR: &str = "VOLUME_ERROR";
pub const SHAPE_MISMATCH: &str = "SHAPE_MISMATCH";
pub const SEARCHLIGHT_ERROR: &str = "SEARCHLIGHT_ERROR";
pub const KERNEL_ERROR: &str = "KERNEL_ERROR";
