//! Memory outcome labels for encoding trials.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::InputError;

/// Behavioural memory outcome of one encoding trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryLabel {
    Forgotten,
    Remembered,
}

impl MemoryLabel {
    /// Labels in scoring order. The bootstrap draws for `Forgotten` happen
    /// before those for `Remembered`.
    pub const ALL: [MemoryLabel; 2] = [MemoryLabel::Forgotten, MemoryLabel::Remembered];

    /// Numeric regressor code: 0 = forgotten, 1 = remembered.
    pub fn code(self) -> u8 {
        match self {
            Self::Forgotten => 0,
            Self::Remembered => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Forgotten => "forgotten",
            Self::Remembered => "remembered",
        }
    }
}

impl fmt::Display for MemoryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-trial memory labels, in trial-timing order.
///
/// A `None` entry is an unlabeled trial (missing regressor value); it
/// matches neither label and is excluded from every label filter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MemoryLabels(Vec<Option<MemoryLabel>>);

impl MemoryLabels {
    /// Fully labeled sequence.
    pub fn new(labels: Vec<MemoryLabel>) -> Self {
        Self(labels.into_iter().map(Some).collect())
    }

    /// Sequence that may contain unlabeled trials.
    pub fn from_optional(labels: Vec<Option<MemoryLabel>>) -> Self {
        Self(labels)
    }

    /// Decode regressor codes: `0` forgotten, `1` remembered, NaN unlabeled.
    /// Any other value is malformed.
    pub fn from_codes(source_name: &str, codes: &[f64]) -> Result<Self, InputError> {
        codes
            .iter()
            .enumerate()
            .map(|(row, &code)| {
                if code.is_nan() {
                    Ok(None)
                } else if code == 0.0 {
                    Ok(Some(MemoryLabel::Forgotten))
                } else if code == 1.0 {
                    Ok(Some(MemoryLabel::Remembered))
                } else {
                    Err(InputError::MalformedLabels {
                        source_name: source_name.to_string(),
                        row,
                        message: format!("expected 0, 1, or empty, found {code}"),
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, trial: usize) -> Option<MemoryLabel> {
        self.0.get(trial).copied().flatten()
    }

    /// Whether `trial` carries exactly `label`.
    pub fn matches(&self, trial: usize, label: MemoryLabel) -> bool {
        self.get(trial) == Some(label)
    }

    /// Number of trials carrying `label`.
    pub fn count(&self, label: MemoryLabel) -> usize {
        self.0.iter().filter(|l| **l == Some(label)).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<MemoryLabel>> + '_ {
        self.0.iter().copied()
    }
}
