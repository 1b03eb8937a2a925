//! Event handler that reports run progress through `tracing`.

use std::sync::atomic::{AtomicUsize, Ordering};

use reinstate_core::events::{
    BlockCompleteEvent, OutputWrittenEvent, PhaseStartedEvent, ReinstateEventHandler,
    RunStartedEvent,
};

/// Logs phase starts, outputs, and block progress in roughly 10% steps.
#[derive(Debug, Default)]
pub struct ProgressLogger {
    last_decile: AtomicUsize,
}

impl ReinstateEventHandler for ProgressLogger {
    fn on_run_started(&self, event: &RunStartedEvent) {
        tracing::info!(
            subject = %event.subject,
            analysis = %event.analysis,
            strategy = %event.strategy,
            "starting searchlight"
        );
    }

    fn on_phase_started(&self, event: &PhaseStartedEvent) {
        tracing::info!(phase = event.phase.name(), "phase started");
    }

    fn on_block_complete(&self, event: &BlockCompleteEvent) {
        if event.total_blocks == 0 {
            return;
        }
        let decile = event.completed_blocks * 10 / event.total_blocks;
        if self.last_decile.fetch_max(decile, Ordering::Relaxed) < decile {
            tracing::info!(
                completed = event.completed_blocks,
                total = event.total_blocks,
                "searchlight {}% complete",
                decile * 10
            );
        }
    }

    fn on_output_written(&self, event: &OutputWrittenEvent) {
        tracing::info!(label = event.label.name(), path = %event.path.display(), "output written");
    }
}
