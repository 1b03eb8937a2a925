//! Output configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// File name suffix for result volumes. Default: `summed_zscore_v2`.
    pub suffix: Option<String>,
}

impl OutputConfig {
    pub fn effective_suffix(&self) -> &str {
        self.suffix.as_deref().unwrap_or("summed_zscore_v2")
    }

    pub(crate) fn merge_from(&mut self, other: &Self) {
        if other.suffix.is_some() {
            self.suffix = other.suffix.clone();
        }
    }
}
