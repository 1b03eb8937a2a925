//! Configuration system for the reinstatement analysis.
//! TOML-based, layered resolution: CLI > env > project > user > defaults.

pub mod acquisition_config;
pub mod output_config;
pub mod paths_config;
pub mod reinstate_config;
pub mod scoring_config;
pub mod searchlight_config;
pub mod subjects_config;

pub use acquisition_config::AcquisitionConfig;
pub use output_config::OutputConfig;
pub use paths_config::PathsConfig;
pub use reinstate_config::{CliOverrides, ReinstateConfig};
pub use scoring_config::ScoringConfig;
pub use searchlight_config::SearchlightConfig;
pub use subjects_config::SubjectsConfig;
