//! Analysis type identifiers (`trialwise_<memory column>`).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::InputError;

const TRIALWISE: &str = "trialwise";

/// Which trialwise reinstatement analysis to run.
///
/// The suffix after `trialwise_` names the memory-regressor column that
/// supplies remembered/forgotten labels (`recognition`, `coarse`, `detailed`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalysisType {
    name: String,
    memory_column: String,
}

impl AnalysisType {
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        let mut parts = raw.split('_');
        let kind = parts.next().unwrap_or_default();
        let column = parts.next().unwrap_or_default();
        if kind != TRIALWISE || column.is_empty() {
            return Err(InputError::UnsupportedAnalysis(raw.to_string()));
        }
        Ok(Self {
            name: raw.to_string(),
            memory_column: column.to_string(),
        })
    }

    /// Full analysis name as given (`trialwise_recognition`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Memory-regressor column used for labels (`recognition`).
    pub fn memory_column(&self) -> &str {
        &self.memory_column
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
