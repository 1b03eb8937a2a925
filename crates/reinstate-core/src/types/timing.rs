//! Encoding-trial timing.

use serde::{Deserialize, Serialize};

use crate::errors::InputError;

/// One encoding trial: onset and duration in the same time units as TR.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    pub onset: f64,
    pub duration: f64,
}

impl Trial {
    pub fn new(onset: f64, duration: f64) -> Self {
        Self { onset, duration }
    }

    /// Half-open sample span `[start, end)` for a sampling interval `tr`.
    ///
    /// `start = floor(onset / tr)`, `end = floor((onset + duration) / tr)`.
    /// A trial shorter than one sample yields `start == end`.
    pub fn sample_span(&self, tr: f64) -> (usize, usize) {
        let start = (self.onset / tr).floor() as usize;
        let end = ((self.onset + self.duration) / tr).floor() as usize;
        (start, end.max(start))
    }
}

/// Ordered encoding-trial timing, validated on construction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrialTiming {
    trials: Vec<Trial>,
}

impl TrialTiming {
    /// Build a timing table. Onsets and durations must be finite and
    /// non-negative.
    pub fn new(source_name: &str, trials: Vec<Trial>) -> Result<Self, InputError> {
        for (i, trial) in trials.iter().enumerate() {
            let malformed = |message: &str| InputError::MalformedTiming {
                source_name: source_name.to_string(),
                trial: i,
                message: message.to_string(),
            };
            if !trial.onset.is_finite() || !trial.duration.is_finite() {
                return Err(malformed("onset and duration must be finite"));
            }
            if trial.onset < 0.0 || trial.duration < 0.0 {
                return Err(malformed("onset and duration must be non-negative"));
            }
        }
        Ok(Self { trials })
    }

    /// Convenience constructor from `(onset, duration)` pairs.
    pub fn from_pairs(source_name: &str, pairs: &[(f64, f64)]) -> Result<Self, InputError> {
        Self::new(
            source_name,
            pairs.iter().map(|&(o, d)| Trial::new(o, d)).collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trial> {
        self.trials.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_span_floor() {
        assert_eq!(Trial::new(0.0, 4.0).sample_span(2.0), (0, 2));
        assert_eq!(Trial::new(4.0, 4.0).sample_span(2.0), (2, 4));
        assert_eq!(Trial::new(3.5, 3.0).sample_span(2.0), (1, 3));
    }

    #[test]
    fn test_sub_sample_trial_is_empty_span() {
        let (start, end) = Trial::new(2.2, 1.0).sample_span(2.0);
        assert_eq!(start, end);
    }

    #[test]
    fn test_rejects_negative_and_nan() {
        assert!(TrialTiming::from_pairs("t", &[(-1.0, 2.0)]).is_err());
        assert!(TrialTiming::from_pairs("t", &[(0.0, f64::NAN)]).is_err());
        assert!(TrialTiming::from_pairs("t", &[(0.0, 2.0), (2.0, 2.0)]).is_ok());
    }
}
