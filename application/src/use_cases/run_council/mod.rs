//! Run Council use case
//!
//! Drives the full three-stage deliberation flow: collect drafts from
//! every first-tier backend, cross-refine each draft per the refiner
//! mapping, then have the judge backend pick the best candidate.
//!
//! Failure policy is strictly layered: per-call retries live in the
//! dispatcher, per-stage degradation lives here (absent drafts are
//! dropped, absent refinements pass the original through, an absent or
//! unparseable verdict falls back to the first refined result), and
//! `execute` itself never fails — a run that collects zero drafts
//! returns an explicit error result instead.

mod dispatch;
mod fanout;
mod types;

pub use dispatch::Dispatcher;
pub use types::{CouncilSettings, RunCouncilInput};

use crate::ports::backend_gateway::BackendGateway;
use crate::ports::progress::{CouncilProgress, NoProgress};
use council_domain::{
    BackendId, Candidate, CouncilResult, FallbackReason, FinalSelection, InvocationRequest,
    Stage1Result, Stage2Result, StagePhase, TaskPrompts, assemble_candidates, render_candidates,
    resolve_selection,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Message used for the run-level "no responses" result.
const ALL_FAILED_MESSAGE: &str = "All backends failed to respond in stage 1";

/// Use case for running one council deliberation
pub struct RunCouncilUseCase {
    dispatcher: Dispatcher,
    prompts: Arc<dyn TaskPrompts>,
    settings: CouncilSettings,
}

impl RunCouncilUseCase {
    pub fn new(
        gateway: Arc<dyn BackendGateway>,
        prompts: Arc<dyn TaskPrompts>,
        settings: CouncilSettings,
    ) -> Self {
        Self {
            dispatcher: Dispatcher::new(gateway),
            prompts,
            settings,
        }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunCouncilInput) -> CouncilResult {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunCouncilInput,
        progress: &dyn CouncilProgress,
    ) -> CouncilResult {
        info!(
            family = self.prompts.family(),
            members = self.settings.members.len(),
            "Starting council run"
        );

        // Stage 1: collect drafts
        let stage1_results = self.stage1_collect(&input, progress).await;
        if stage1_results.is_empty() {
            warn!("No stage 1 responses, aborting run");
            progress.on_error(ALL_FAILED_MESSAGE);
            return CouncilResult::all_failed(ALL_FAILED_MESSAGE);
        }
        progress.on_stage1_complete(&stage1_results);

        // Stage 2: cross-refine every draft
        let stage2_results = self.stage2_refine(&input, &stage1_results, progress).await;
        progress.on_stage2_complete(&stage2_results);

        // Stage 3: adjudicate
        let final_result = self
            .stage3_adjudicate(&input, &stage1_results, &stage2_results, progress)
            .await;
        progress.on_stage3_complete(&final_result);

        CouncilResult::completed(stage1_results, stage2_results, final_result)
    }

    /// Stage 1: query every first-tier backend in parallel.
    ///
    /// The drafting prompt is deterministic and identical for all
    /// members. Absent outcomes are dropped here — retries already
    /// happened inside the dispatcher. Results come back in configured
    /// member order regardless of completion order.
    async fn stage1_collect(
        &self,
        input: &RunCouncilInput,
        progress: &dyn CouncilProgress,
    ) -> Vec<Stage1Result> {
        info!("Stage 1: Collect Drafts");
        progress.on_stage_start(StagePhase::Collect);

        let prompt = self.prompts.stage1_prompt(&input.query);
        let jobs = self
            .settings
            .members
            .iter()
            .enumerate()
            .map(|(i, member)| (i, member.clone(), self.request(&prompt, input)))
            .collect();

        let outcomes = self.dispatcher.dispatch_all(jobs).await;

        let mut results = Vec::new();
        for (i, member) in self.settings.members.iter().enumerate() {
            match outcomes.get(&i) {
                Some(Some(outcome)) => {
                    info!(backend = %member, "Stage 1 draft received");
                    results.push(Stage1Result::new(
                        member.clone(),
                        outcome.content.clone(),
                        self.prompts.family(),
                    ));
                }
                _ => {
                    warn!(backend = %member, "Stage 1 draft absent");
                }
            }
        }
        results
    }

    /// Stage 2: schedule one refinement per (origin × refiner) pair.
    ///
    /// The pair matrix is fanned out in full; a failed pair degrades to
    /// pass-through of the original text, it never aborts the stage or
    /// drops the pair.
    async fn stage2_refine(
        &self,
        input: &RunCouncilInput,
        stage1_results: &[Stage1Result],
        progress: &dyn CouncilProgress,
    ) -> Vec<Stage2Result> {
        info!("Stage 2: Cross-Refine");
        progress.on_stage_start(StagePhase::Refine);

        let pairs: Vec<(BackendId, BackendId, String)> = stage1_results
            .iter()
            .flat_map(|result| {
                self.settings
                    .refiners
                    .refiners_for(&result.backend)
                    .into_iter()
                    .map(|refiner| (result.backend.clone(), refiner, result.response.clone()))
            })
            .collect();

        let jobs = pairs
            .iter()
            .enumerate()
            .map(|(i, (origin, refiner, original))| {
                let prompt = self.prompts.stage2_prompt(origin, original);
                (i, refiner.clone(), self.request(&prompt, input))
            })
            .collect();

        let outcomes = self.dispatcher.dispatch_all(jobs).await;

        pairs
            .into_iter()
            .enumerate()
            .map(|(i, (origin, refiner, original))| {
                match outcomes.get(&i).and_then(|o| o.as_ref()) {
                    Some(outcome) => {
                        Stage2Result::refined(origin, refiner, original, outcome.content.clone())
                    }
                    None => {
                        warn!(refiner = %refiner, origin = %origin, "Refinement failed, passing original through");
                        Stage2Result::pass_through(origin, refiner, original)
                    }
                }
            })
            .collect()
    }

    /// Stage 3: assemble candidates, ask the judge once, resolve the
    /// verdict.
    ///
    /// The judge is invoked exactly once per run, even for a
    /// single-candidate set, so every result carries a rationale string
    /// when one was obtainable.
    async fn stage3_adjudicate(
        &self,
        input: &RunCouncilInput,
        stage1_results: &[Stage1Result],
        stage2_results: &[Stage2Result],
        progress: &dyn CouncilProgress,
    ) -> FinalSelection {
        info!("Stage 3: Adjudicate");
        progress.on_stage_start(StagePhase::Adjudicate);

        let candidates = assemble_candidates(stage1_results, stage2_results);
        let prompt = self
            .prompts
            .stage3_prompt(&input.query, &render_candidates(&candidates));
        let request = self.request(&prompt, input);

        let Some(outcome) = self
            .dispatcher
            .dispatch(&self.settings.chairman, &request)
            .await
        else {
            warn!(chairman = %self.settings.chairman, "Judge call failed");
            return fallback_selection(
                stage2_results,
                &candidates,
                None,
                FallbackReason::EvaluationFailed,
            );
        };

        let verdict = outcome.content;
        match resolve_selection(&verdict, candidates.len()) {
            Some(index) => {
                let winner = &candidates[index];
                info!(label = %winner.label, backend = %winner.provenance.origin(), "Judge selected candidate");
                FinalSelection::chosen(
                    winner.text.clone(),
                    winner.provenance.origin().clone(),
                    verdict,
                )
            }
            None => {
                warn!("No parseable selection in judge verdict");
                fallback_selection(
                    stage2_results,
                    &candidates,
                    Some(verdict),
                    FallbackReason::Unparseable,
                )
            }
        }
    }

    fn request(&self, prompt: &str, input: &RunCouncilInput) -> InvocationRequest {
        InvocationRequest::from_prompt(prompt)
            .with_image(input.image.clone())
            .with_timeout(self.settings.timeout)
            .with_retries(self.settings.retries)
    }
}

/// Degraded selection: the first Stage-2 result, or the first candidate
/// when the refinement matrix was empty.
fn fallback_selection(
    stage2_results: &[Stage2Result],
    candidates: &[Candidate],
    evaluation: Option<String>,
    reason: FallbackReason,
) -> FinalSelection {
    if let Some(first) = stage2_results.first() {
        FinalSelection::fallback(
            first.refined.clone(),
            first.origin.clone(),
            evaluation,
            reason.as_str(),
        )
    } else {
        let first = &candidates[0];
        FinalSelection::fallback(
            first.text.clone(),
            first.provenance.origin().clone(),
            evaluation,
            reason.as_str(),
        )
    }
}
