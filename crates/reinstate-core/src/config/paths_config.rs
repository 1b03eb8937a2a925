//! Input/output locations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Filesystem layout of a study. Every directory defaults to a fixed
/// subdirectory of `base_dir`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PathsConfig {
    /// Study root. Default: the current directory.
    pub base_dir: Option<PathBuf>,
    /// Preprocessed functional runs. Default: `<base>/mvpa_preproc_files`.
    pub preproc_dir: Option<PathBuf>,
    /// Trial timing and memory regressors. Default: `<base>/Ginsburg_Timing_Info`.
    pub timing_dir: Option<PathBuf>,
    /// Result volumes. Default: `<base>/similarity_searchlight`.
    pub output_dir: Option<PathBuf>,
    /// Standard-space brain mask. Default: `<base>/intersect_mask.nii.gz`.
    pub brain_mask: Option<PathBuf>,
}

impl PathsConfig {
    pub fn effective_base_dir(&self) -> &Path {
        self.base_dir.as_deref().unwrap_or_else(|| Path::new("."))
    }

    pub fn effective_preproc_dir(&self) -> PathBuf {
        self.preproc_dir
            .clone()
            .unwrap_or_else(|| self.effective_base_dir().join("mvpa_preproc_files"))
    }

    pub fn effective_timing_dir(&self) -> PathBuf {
        self.timing_dir
            .clone()
            .unwrap_or_else(|| self.effective_base_dir().join("Ginsburg_Timing_Info"))
    }

    pub fn effective_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| self.effective_base_dir().join("similarity_searchlight"))
    }

    pub fn effective_brain_mask(&self) -> PathBuf {
        self.brain_mask
            .clone()
            .unwrap_or_else(|| self.effective_base_dir().join("intersect_mask.nii.gz"))
    }

    pub(crate) fn merge_from(&mut self, other: &Self) {
        if other.base_dir.is_some() {
            self.base_dir = other.base_dir.clone();
        }
        if other.preproc_dir.is_some() {
            self.preproc_dir = other.preproc_dir.clone();
        }
        if other.timing_dir.is_some() {
            self.timing_dir = other.timing_dir.clone();
        }
        if other.output_dir.is_some() {
            self.output_dir = other.output_dir.clone();
        }
        if other.brain_mask.is_some() {
            self.brain_mask = other.brain_mask.clone();
        }
    }
}
