//! Stage phases and per-stage result types.
//!
//! A council run walks `Collect → Refine → Adjudicate`; a run that gets
//! zero first-tier answers stops after Collect. Stage results are
//! immutable once produced: Stage 2 and Stage 3 read them, nothing
//! rewrites them.

use crate::core::backend::BackendId;
use serde::{Deserialize, Serialize};

/// Phase of a council run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StagePhase {
    /// Stage 1 - every first-tier backend drafts an answer
    Collect,
    /// Stage 2 - refiner backends rework each draft
    Refine,
    /// Stage 3 - the judge backend picks the best candidate
    Adjudicate,
}

impl StagePhase {
    pub fn as_str(&self) -> &str {
        match self {
            StagePhase::Collect => "stage1",
            StagePhase::Refine => "stage2",
            StagePhase::Adjudicate => "stage3",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            StagePhase::Collect => "Collect Drafts",
            StagePhase::Refine => "Cross-Refine",
            StagePhase::Adjudicate => "Adjudicate",
        }
    }
}

impl std::fmt::Display for StagePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// One first-tier answer from Stage 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage1Result {
    /// Backend that produced the draft.
    pub backend: BackendId,
    /// Raw draft text.
    pub response: String,
    /// Task-family tag, e.g. "outpainting".
    pub task: String,
}

impl Stage1Result {
    pub fn new(
        backend: impl Into<BackendId>,
        response: impl Into<String>,
        task: impl Into<String>,
    ) -> Self {
        Self {
            backend: backend.into(),
            response: response.into(),
            task: task.into(),
        }
    }
}

/// One refined answer from Stage 2, for a single (origin × refiner) pair.
///
/// When refinement fails, `refined` carries the unmodified original text
/// and `failure` names the refiner that failed — refinement degrades to
/// pass-through, never to pipeline failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage2Result {
    /// Backend that produced the original draft.
    pub origin: BackendId,
    /// Backend asked to refine it.
    pub refiner: BackendId,
    /// The unrefined Stage-1 text.
    pub original: String,
    /// The refined text (equals `original` when refinement failed).
    pub refined: String,
    /// Failure marker naming the refiner, when refinement failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl Stage2Result {
    /// A successful refinement.
    pub fn refined(
        origin: impl Into<BackendId>,
        refiner: impl Into<BackendId>,
        original: impl Into<String>,
        refined: impl Into<String>,
    ) -> Self {
        Self {
            origin: origin.into(),
            refiner: refiner.into(),
            original: original.into(),
            refined: refined.into(),
            failure: None,
        }
    }

    /// A failed refinement: the original text passes through unchanged.
    pub fn pass_through(
        origin: impl Into<BackendId>,
        refiner: impl Into<BackendId>,
        original: impl Into<String>,
    ) -> Self {
        let refiner = refiner.into();
        let original = original.into();
        Self {
            origin: origin.into(),
            failure: Some(format!("refinement by {refiner} failed")),
            refiner,
            refined: original.clone(),
            original,
        }
    }

    pub fn is_pass_through(&self) -> bool {
        self.failure.is_some()
    }
}
