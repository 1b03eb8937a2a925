//! Error handling for the reinstatement analysis.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod config_error;
pub mod error_code;
pub mod input_error;
pub mod kernel_error;
pub mod pipeline_error;
pub mod searchlight_error;
pub mod volume_error;

pub use config_error::ConfigError;
pub use error_code::ReinstateErrorCode;
pub use input_error::InputError;
pub use kernel_error::KernelError;
pub use pipeline_error::PipelineError;
pub use searchlight_error::SearchlightError;
pub use volume_error::VolumeError;
