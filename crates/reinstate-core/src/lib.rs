//! reinstate-core: shared foundation for the searchlight reinstatement analysis.
//!
//! - Config: layered TOML configuration (CLI > env > project > user > defaults)
//! - Errors: one `thiserror` enum per subsystem with stable error codes
//! - Events: synchronous pipeline lifecycle events
//! - Tracing: `tracing-subscriber` setup driven by `REINSTATE_LOG`
//! - Types: subjects, analysis types, trial timing, memory labels, outcomes

pub mod config;
pub mod errors;
pub mod events;
pub mod tracing;
pub mod types;

pub use config::ReinstateConfig;
pub use types::{
    AnalysisType, MemoryLabel, MemoryLabels, NeighborhoodShape, OutcomeLabel, ScoringStrategy,
    SubjectId, Trial, TrialTiming,
};
