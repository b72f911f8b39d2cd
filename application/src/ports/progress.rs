//! Progress notification port
//!
//! Stage-boundary events emitted while a council run executes, so a
//! transport or console layer can stream progress without the core
//! depending on any encoding.

use council_domain::{FinalSelection, Stage1Result, Stage2Result, StagePhase};

/// Callback for progress updates during a council run
pub trait CouncilProgress: Send + Sync {
    /// Called when a stage starts.
    fn on_stage_start(&self, stage: StagePhase);

    /// Called with every first-tier draft once Stage 1 settles.
    fn on_stage1_complete(&self, results: &[Stage1Result]);

    /// Called with the full refinement matrix once Stage 2 settles.
    fn on_stage2_complete(&self, results: &[Stage2Result]);

    /// Called with the final selection once adjudication settles.
    fn on_stage3_complete(&self, selection: &FinalSelection);

    /// Called when the run terminates without a selection.
    fn on_error(&self, message: &str);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl CouncilProgress for NoProgress {
    fn on_stage_start(&self, _stage: StagePhase) {}
    fn on_stage1_complete(&self, _results: &[Stage1Result]) {}
    fn on_stage2_complete(&self, _results: &[Stage2Result]) {}
    fn on_stage3_complete(&self, _selection: &FinalSelection) {}
    fn on_error(&self, _message: &str) {}
}
