//! Event payload types.

use std::fmt;
use std::path::PathBuf;

use crate::types::{OutcomeLabel, ScoringStrategy};

/// The single-pass phases of a searchlight run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchlightPhase {
    Distribute,
    Broadcast,
    Run,
    Collect,
    Persist,
}

impl SearchlightPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Distribute => "distribute",
            Self::Broadcast => "broadcast",
            Self::Run => "run",
            Self::Collect => "collect",
            Self::Persist => "persist",
        }
    }
}

impl fmt::Display for SearchlightPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload for `on_run_started`.
#[derive(Debug, Clone)]
pub struct RunStartedEvent {
    pub subject: String,
    pub analysis: String,
    pub strategy: ScoringStrategy,
}

/// Payload for `on_phase_started`.
#[derive(Debug, Clone)]
pub struct PhaseStartedEvent {
    pub phase: SearchlightPhase,
}

/// Payload for `on_phase_complete`.
#[derive(Debug, Clone)]
pub struct PhaseCompleteEvent {
    pub phase: SearchlightPhase,
    pub duration_ms: u64,
}

/// Payload for `on_block_complete`. Emitted from worker threads.
#[derive(Debug, Clone)]
pub struct BlockCompleteEvent {
    pub completed_blocks: usize,
    pub total_blocks: usize,
    pub neighborhoods: usize,
}

/// Payload for `on_output_written`.
#[derive(Debug, Clone)]
pub struct OutputWrittenEvent {
    pub label: OutcomeLabel,
    pub path: PathBuf,
}

/// Payload for `on_run_complete`.
#[derive(Debug, Clone)]
pub struct RunCompleteEvent {
    pub scored: usize,
    pub skipped: usize,
    pub outputs: usize,
    pub duration_ms: u64,
}

/// Payload for `on_error`.
#[derive(Debug, Clone)]
pub struct ErrorEvent {
    pub message: String,
    pub error_code: String,
}
