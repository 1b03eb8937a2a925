//! Participant identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::InputError;

/// A participant identifier, stored as its bare numeric form (e.g. `141`).
///
/// The imaging data uses the `sub-141` form and the behavioural timing
/// files use the `EL141` form; both are derived from the same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubjectId(String);

impl SubjectId {
    /// Parse a subject id from `141`, `sub-141`, or `EL141`.
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        let trimmed = raw.trim();
        let bare = trimmed
            .strip_prefix("sub-")
            .or_else(|| trimmed.strip_prefix("EL"))
            .unwrap_or(trimmed);
        if bare.is_empty() || !bare.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(InputError::InvalidSubject(raw.to_string()));
        }
        Ok(Self(bare.to_string()))
    }

    /// The bare id (`141`).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identifier used by the preprocessed imaging data (`sub-141`).
    pub fn imaging_id(&self) -> String {
        format!("sub-{}", self.0)
    }

    /// Identifier used by the behavioural timing files (`EL141`).
    pub fn timing_id(&self) -> String {
        format!("EL{}", self.0)
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.imaging_id())
    }
}
