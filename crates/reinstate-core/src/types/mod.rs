//! Domain types shared across the workspace.

pub mod analysis;
pub mod memory;
pub mod outcome;
pub mod run;
pub mod shape;
pub mod subject;
pub mod timing;

pub use analysis::AnalysisType;
pub use memory::{MemoryLabel, MemoryLabels};
pub use outcome::{OutcomeLabel, ScoringStrategy};
pub use run::RunKind;
pub use shape::NeighborhoodShape;
pub use subject::SubjectId;
pub use timing::{Trial, TrialTiming};
