//! ReinstateEventHandler trait, all methods with no-op defaults.

use super::types::*;

/// Trait for handling pipeline events.
///
/// All methods have no-op default implementations, so handlers only need
/// to override the events they care about. `Send + Sync` is required
/// because block completions are reported from worker threads.
pub trait ReinstateEventHandler: Send + Sync {
    fn on_run_started(&self, _event: &RunStartedEvent) {}
    fn on_phase_started(&self, _event: &PhaseStartedEvent) {}
    fn on_phase_complete(&self, _event: &PhaseCompleteEvent) {}
    fn on_block_complete(&self, _event: &BlockCompleteEvent) {}
    fn on_output_written(&self, _event: &OutputWrittenEvent) {}
    fn on_run_complete(&self, _event: &RunCompleteEvent) {}
    fn on_error(&self, _event: &ErrorEvent) {}
}
