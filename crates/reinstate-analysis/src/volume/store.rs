//! Volume persistence seam.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use reinstate_core::errors::VolumeError;

use super::{Volume3, Volume4};

/// Loads runs and masks, and saves result maps.
pub trait VolumeStore: Send + Sync {
    fn load_run(&self, path: &Path) -> Result<Volume4, VolumeError>;
    fn load_image(&self, path: &Path) -> Result<Volume3, VolumeError>;
    fn save_image(&self, volume: &Volume3, path: &Path) -> Result<(), VolumeError>;

    /// Whether `path` can be loaded.
    fn exists(&self, path: &Path) -> bool;
}

#[derive(Debug, Clone)]
enum Stored {
    Run(Volume4),
    Image(Volume3),
}

/// In-memory store keyed by path. For tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemoryVolumeStore {
    volumes: Mutex<HashMap<PathBuf, Stored>>,
}

impl InMemoryVolumeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_run(&self, path: impl Into<PathBuf>, volume: Volume4) {
        if let Ok(mut volumes) = self.volumes.lock() {
            volumes.insert(path.into(), Stored::Run(volume));
        }
    }

    pub fn insert_image(&self, path: impl Into<PathBuf>, volume: Volume3) {
        if let Ok(mut volumes) = self.volumes.lock() {
            volumes.insert(path.into(), Stored::Image(volume));
        }
    }

    /// Paths of every stored volume, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .volumes
            .lock()
            .map(|v| v.keys().cloned().collect())
            .unwrap_or_default();
        paths.sort();
        paths
    }

    fn get(&self, path: &Path) -> Result<Stored, VolumeError> {
        self.volumes
            .lock()
            .map_err(|e| VolumeError::Decode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
            .get(path)
            .cloned()
            .ok_or_else(|| VolumeError::NotFound(path.to_path_buf()))
    }
}

impl VolumeStore for InMemoryVolumeStore {
    fn load_run(&self, path: &Path) -> Result<Volume4, VolumeError> {
        match self.get(path)? {
            Stored::Run(v) => Ok(v),
            Stored::Image(_) => Err(VolumeError::Dimensionality {
                path: path.to_path_buf(),
                expected: 4,
                found: 3,
            }),
        }
    }

    fn load_image(&self, path: &Path) -> Result<Volume3, VolumeError> {
        match self.get(path)? {
            Stored::Image(v) => Ok(v),
            Stored::Run(_) => Err(VolumeError::Dimensionality {
                path: path.to_path_buf(),
                expected: 3,
                found: 4,
            }),
        }
    }

    fn save_image(&self, volume: &Volume3, path: &Path) -> Result<(), VolumeError> {
        self.insert_image(path, volume.clone());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.volumes
            .lock()
            .map(|v| v.contains_key(path))
            .unwrap_or(false)
    }
}
