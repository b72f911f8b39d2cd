//! Candidate assembly for Stage 3.
//!
//! Candidates are rebuilt fresh for every adjudication: one raw draft per
//! distinct originating backend (first seen wins, so no backend gets its
//! unrefined text counted twice), followed by every refined result.
//! Labels are assigned by strict position (A, B, C, ...) and are only
//! meaningful within the single evaluation prompt they were rendered into.

use crate::core::backend::BackendId;
use crate::council::stage::{Stage1Result, Stage2Result};
use serde::{Deserialize, Serialize};

/// Which stage a candidate came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "stage")]
pub enum Provenance {
    /// Unrefined Stage-1 draft.
    RawDraft { origin: BackendId },
    /// Stage-2 refinement of a draft.
    Refined {
        origin: BackendId,
        refiner: BackendId,
    },
}

impl Provenance {
    /// The backend credited with the candidate text's origin.
    pub fn origin(&self) -> &BackendId {
        match self {
            Provenance::RawDraft { origin } => origin,
            Provenance::Refined { origin, .. } => origin,
        }
    }
}

/// One item eligible for final selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Positional label, 'A' onwards.
    pub label: char,
    /// Human-readable source description for the evaluation prompt.
    pub source: String,
    /// Candidate text.
    pub text: String,
    /// Which stage produced the text.
    pub provenance: Provenance,
}

impl Candidate {
    /// Render this candidate as one block of the evaluation prompt.
    pub fn render(&self) -> String {
        format!("Response {} ({}):\n{}", self.label, self.source, self.text)
    }
}

/// Assemble the Stage-3 candidate list from both prior stages.
///
/// Raw drafts come first, deduplicated by originating backend in
/// first-seen order; refined results follow in Stage-2 order.
pub fn assemble_candidates(stage1: &[Stage1Result], stage2: &[Stage2Result]) -> Vec<Candidate> {
    let mut candidates = Vec::with_capacity(stage1.len() + stage2.len());
    let mut seen_origins: Vec<&BackendId> = Vec::new();

    for result in stage1 {
        if seen_origins.contains(&&result.backend) {
            continue;
        }
        seen_origins.push(&result.backend);
        candidates.push(Candidate {
            label: label_for(candidates.len()),
            source: format!("initial draft from {}", result.backend),
            text: result.response.clone(),
            provenance: Provenance::RawDraft {
                origin: result.backend.clone(),
            },
        });
    }

    for result in stage2 {
        candidates.push(Candidate {
            label: label_for(candidates.len()),
            source: format!("refined by {} from {}", result.refiner, result.origin),
            text: result.refined.clone(),
            provenance: Provenance::Refined {
                origin: result.origin.clone(),
                refiner: result.refiner.clone(),
            },
        });
    }

    candidates
}

/// Render all candidates into the body of the evaluation prompt.
pub fn render_candidates(candidates: &[Candidate]) -> String {
    candidates
        .iter()
        .map(Candidate::render)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn label_for(position: usize) -> char {
    (b'A' + position as u8) as char
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage1(backend: &str, text: &str) -> Stage1Result {
        Stage1Result::new(backend, text, "outpainting")
    }

    fn stage2(origin: &str, refiner: &str, refined: &str) -> Stage2Result {
        Stage2Result::refined(origin, refiner, "orig", refined)
    }

    #[test]
    fn test_labels_are_strictly_positional() {
        let s1 = vec![stage1("a1", "draft a1"), stage1("a2", "draft a2")];
        let s2 = vec![stage2("a1", "b1", "refined a1"), stage2("a2", "b2", "refined a2")];

        let candidates = assemble_candidates(&s1, &s2);
        let labels: Vec<char> = candidates.iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!['A', 'B', 'C', 'D']);
    }

    #[test]
    fn test_raw_drafts_deduplicated_by_origin() {
        let s1 = vec![
            stage1("a1", "first draft"),
            stage1("a1", "second draft from same backend"),
            stage1("a2", "other"),
        ];
        let candidates = assemble_candidates(&s1, &[]);

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].text, "first draft");
        assert_eq!(candidates[1].text, "other");
    }

    #[test]
    fn test_raw_before_refined_ordering() {
        let s1 = vec![stage1("a1", "raw")];
        let s2 = vec![stage2("a1", "b1", "polished")];
        let candidates = assemble_candidates(&s1, &s2);

        assert!(matches!(
            candidates[0].provenance,
            Provenance::RawDraft { .. }
        ));
        assert!(matches!(
            candidates[1].provenance,
            Provenance::Refined { .. }
        ));
    }

    #[test]
    fn test_render_contains_label_and_source() {
        let s1 = vec![stage1("a1", "the draft")];
        let candidates = assemble_candidates(&s1, &[]);
        let rendered = render_candidates(&candidates);

        assert!(rendered.contains("Response A"));
        assert!(rendered.contains("initial draft from a1"));
        assert!(rendered.contains("the draft"));
    }

    #[test]
    fn test_provenance_origin_accessor() {
        let refined = Provenance::Refined {
            origin: BackendId::new("a2"),
            refiner: BackendId::new("b2"),
        };
        assert_eq!(refined.origin().as_str(), "a2");
    }
}
