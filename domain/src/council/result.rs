//! Council run result types.
//!
//! [`CouncilResult`] bundles every stage's artifacts plus the final
//! selection. It is returned to the caller once per run and handed to the
//! persistence hook as an opaque structured value; the engine keeps no
//! copy of it.

use crate::core::backend::BackendId;
use crate::council::stage::{Stage1Result, Stage2Result};
use serde::{Deserialize, Serialize};

/// The judge's choice (or the recorded fallback)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalSelection {
    /// Text of the winning candidate.
    pub response: String,
    /// Backend credited as the winner's origin.
    pub backend: BackendId,
    /// The judge's full verdict text, when a verdict was received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<String>,
    /// Reason the selection degraded to the fallback candidate, if it did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

impl FinalSelection {
    /// A selection the judge made explicitly.
    pub fn chosen(
        response: impl Into<String>,
        backend: impl Into<BackendId>,
        evaluation: impl Into<String>,
    ) -> Self {
        Self {
            response: response.into(),
            backend: backend.into(),
            evaluation: Some(evaluation.into()),
            fallback: None,
        }
    }

    /// A fallback selection, with the reason recorded.
    pub fn fallback(
        response: impl Into<String>,
        backend: impl Into<BackendId>,
        evaluation: Option<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            response: response.into(),
            backend: backend.into(),
            evaluation,
            fallback: Some(reason.into()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Full pipeline output for one council run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouncilResult {
    /// Stage 1: first-tier drafts that arrived.
    pub stage1_results: Vec<Stage1Result>,
    /// Stage 2: one entry per (origin × refiner) pair.
    pub stage2_results: Vec<Stage2Result>,
    /// Stage 3: the winner, absent when the run failed before Stage 3.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_result: Option<FinalSelection>,
    /// Run-level error, populated only when all of Stage 1 failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CouncilResult {
    pub fn completed(
        stage1_results: Vec<Stage1Result>,
        stage2_results: Vec<Stage2Result>,
        final_result: FinalSelection,
    ) -> Self {
        Self {
            stage1_results,
            stage2_results,
            final_result: Some(final_result),
            error: None,
        }
    }

    /// The explicit "no responses" result for a run whose every
    /// first-tier call came back absent.
    pub fn all_failed(message: impl Into<String>) -> Self {
        Self {
            stage1_results: Vec::new(),
            stage2_results: Vec::new(),
            final_result: None,
            error: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_failed_has_no_stage_data() {
        let result = CouncilResult::all_failed("All backends failed to respond in stage 1");
        assert!(result.is_error());
        assert!(result.stage1_results.is_empty());
        assert!(result.stage2_results.is_empty());
        assert!(result.final_result.is_none());
    }

    #[test]
    fn test_chosen_selection_is_not_fallback() {
        let selection = FinalSelection::chosen("text", "a1", "BEST RESPONSE: Response A");
        assert!(!selection.is_fallback());
        assert!(selection.evaluation.is_some());
    }

    #[test]
    fn test_fallback_selection_records_reason() {
        let selection = FinalSelection::fallback(
            "text",
            "a1",
            None,
            "Evaluation failed, selected first response as fallback",
        );
        assert!(selection.is_fallback());
        assert!(selection.fallback.as_ref().unwrap().contains("fallback"));
    }

    #[test]
    fn test_result_serde_omits_absent_fields() {
        let result = CouncilResult::all_failed("boom");
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("final_result"));
        assert!(json.contains("error"));
    }
}
