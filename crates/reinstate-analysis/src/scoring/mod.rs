//! Reinstatement scoring for one neighborhood.

pub mod outcome;
pub mod scorer;

pub use outcome::{NeighborhoodOutcome, NeighborhoodScores};
pub use scorer::{ReinstatementScorer, ScorerConfig};
