//! Scoring strategies and the outcome labels they produce.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One persisted statistic per neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeLabel {
    Remembered,
    Forgotten,
    Difference,
    DifferencePre,
    DifferencePost,
}

impl OutcomeLabel {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Remembered => "remembered",
            Self::Forgotten => "forgotten",
            Self::Difference => "difference",
            Self::DifferencePre => "difference_pre",
            Self::DifferencePost => "difference_post",
        }
    }
}

impl fmt::Display for OutcomeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How per-label bootstrap estimates are combined.
///
/// - `Corrected`: post-vs-pre per label, then remembered-vs-forgotten on
///   the resulting distributions.
/// - `Uncorrected`: remembered-vs-forgotten within pre rest and within
///   post rest, with no post-vs-pre subtraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringStrategy {
    #[default]
    Corrected,
    Uncorrected,
}

impl ScoringStrategy {
    /// Outcome labels in the order scores are produced.
    pub fn outcome_labels(&self) -> &'static [OutcomeLabel] {
        match self {
            Self::Corrected => &[
                OutcomeLabel::Remembered,
                OutcomeLabel::Forgotten,
                OutcomeLabel::Difference,
            ],
            Self::Uncorrected => &[OutcomeLabel::DifferencePre, OutcomeLabel::DifferencePost],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Corrected => "corrected",
            Self::Uncorrected => "uncorrected",
        }
    }
}

impl fmt::Display for ScoringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScoringStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "corrected" => Ok(Self::Corrected),
            "uncorrected" => Ok(Self::Uncorrected),
            other => Err(format!("unknown scoring strategy '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_label_counts() {
        assert_eq!(ScoringStrategy::Corrected.outcome_labels().len(), 3);
        assert_eq!(ScoringStrategy::Uncorrected.outcome_labels().len(), 2);
        assert_eq!(ScoringStrategy::default(), ScoringStrategy::Corrected);
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("Uncorrected".parse::<ScoringStrategy>(), Ok(ScoringStrategy::Uncorrected));
        assert!("both".parse::<ScoringStrategy>().is_err());
    }
}
