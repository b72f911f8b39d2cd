//! Council deliberation domain
//!
//! Core concepts for the three-stage deliberation pipeline:
//!
//! - **Collect** - every first-tier backend drafts an answer in parallel
//! - **Cross-Refine** - refiner backends rework each draft, per the
//!   task family's refiner mapping (1:1 or full matrix)
//! - **Adjudicate** - a judge backend compares raw and refined candidates
//!   and names a single winner
//!
//! Everything here is pure data and text logic: stage results, candidate
//! assembly, and verdict parsing. No I/O, no scheduling.

pub mod candidate;
pub mod refiner;
pub mod result;
pub mod stage;
pub mod verdict;

// Re-export main types
pub use candidate::{Candidate, Provenance, assemble_candidates, render_candidates};
pub use refiner::RefinerMapping;
pub use result::{CouncilResult, FinalSelection};
pub use stage::{Stage1Result, Stage2Result, StagePhase};
pub use verdict::{FallbackReason, letter_index, parse_selection, resolve_selection};
