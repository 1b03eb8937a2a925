//! Top-level configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{
    AcquisitionConfig, OutputConfig, PathsConfig, ScoringConfig, SearchlightConfig,
    SubjectsConfig,
};
use crate::errors::ConfigError;
use crate::types::ScoringStrategy;

/// Project config file name, looked up in the working root.
pub const PROJECT_CONFIG_FILE: &str = "reinstate.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`REINSTATE_*`)
/// 3. Project config (`reinstate.toml` in the working root)
/// 4. User config (`~/.reinstate/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReinstateConfig {
    pub paths: PathsConfig,
    pub acquisition: AcquisitionConfig,
    pub searchlight: SearchlightConfig,
    pub scoring: ScoringConfig,
    pub subjects: SubjectsConfig,
    pub output: OutputConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub base_dir: Option<PathBuf>,
    pub strategy: Option<ScoringStrategy>,
    pub pool_size: Option<usize>,
    pub seed: Option<u64>,
    pub n_perm: Option<usize>,
}

impl ReinstateConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Lowest priority: user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Project config
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Environment variables
        Self::apply_env_overrides(&mut config);

        // Highest priority: CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;
        tracing::debug!(root = %root.display(), "configuration resolved");

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &ReinstateConfig) -> Result<(), ConfigError> {
        fn invalid(field: &str, message: &str) -> ConfigError {
            ConfigError::ValidationFailed {
                field: field.to_string(),
                message: message.to_string(),
            }
        }

        let tr = config.acquisition.effective_tr();
        if !tr.is_finite() || tr <= 0.0 {
            return Err(invalid("acquisition.tr", "must be a positive number"));
        }
        let mask_threshold = config.acquisition.effective_mask_threshold();
        if !(0.0..=1.0).contains(&mask_threshold) {
            return Err(invalid(
                "acquisition.mask_threshold",
                "must be between 0.0 and 1.0",
            ));
        }
        if config.searchlight.effective_radius() == 0 {
            return Err(invalid("searchlight.radius", "must be at least 1"));
        }
        if config.searchlight.effective_max_block_edge() == 0 {
            return Err(invalid("searchlight.max_block_edge", "must be at least 1"));
        }
        if config.searchlight.effective_pool_size() == 0 {
            return Err(invalid("searchlight.pool_size", "must be at least 1"));
        }
        if config.scoring.effective_n_perm() < 2 {
            return Err(invalid("scoring.n_perm", "must be at least 2"));
        }
        if !config.scoring.effective_threshold_sd().is_finite() {
            return Err(invalid("scoring.threshold_sd", "must be finite"));
        }
        if config.output.effective_suffix().is_empty() {
            return Err(invalid("output.suffix", "must not be empty"));
        }
        Ok(())
    }

    /// Returns the user config path: `~/.reinstate/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".reinstate").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are ignored.
    fn merge_toml_file(config: &mut ReinstateConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: ReinstateConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `Some` values in `other` win.
    fn merge(base: &mut ReinstateConfig, other: &ReinstateConfig) {
        base.paths.merge_from(&other.paths);
        base.acquisition.merge_from(&other.acquisition);
        base.searchlight.merge_from(&other.searchlight);
        base.scoring.merge_from(&other.scoring);
        base.subjects.merge_from(&other.subjects);
        base.output.merge_from(&other.output);
    }

    /// Apply environment variable overrides.
    /// Unparseable values are ignored with a warning.
    fn apply_env_overrides(config: &mut ReinstateConfig) {
        fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
            let raw = std::env::var(key).ok()?;
            match raw.parse::<T>() {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(key, value = %raw, "ignoring unparseable environment override");
                    None
                }
            }
        }

        if let Ok(val) = std::env::var("REINSTATE_BASE_DIR") {
            config.paths.base_dir = Some(PathBuf::from(val));
        }
        if let Some(v) = parsed::<f64>("REINSTATE_TR") {
            config.acquisition.tr = Some(v);
        }
        if let Some(v) = parsed::<usize>("REINSTATE_RADIUS") {
            config.searchlight.radius = Some(v);
        }
        if let Some(v) = parsed::<usize>("REINSTATE_POOL_SIZE") {
            config.searchlight.pool_size = Some(v);
        }
        if let Some(v) = parsed::<ScoringStrategy>("REINSTATE_STRATEGY") {
            config.scoring.strategy = Some(v);
        }
        if let Some(v) = parsed::<usize>("REINSTATE_N_PERM") {
            config.scoring.n_perm = Some(v);
        }
        if let Some(v) = parsed::<u64>("REINSTATE_SEED") {
            config.scoring.seed = Some(v);
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut ReinstateConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.base_dir {
            config.paths.base_dir = Some(v.clone());
        }
        if let Some(v) = cli.strategy {
            config.scoring.strategy = Some(v);
        }
        if let Some(v) = cli.pool_size {
            config.searchlight.pool_size = Some(v);
        }
        if let Some(v) = cli.seed {
            config.scoring.seed = Some(v);
        }
        if let Some(v) = cli.n_perm {
            config.scoring.n_perm = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
