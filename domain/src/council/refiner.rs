//! Refiner mapping policy for Stage 2.
//!
//! A task family declares how first-tier drafts map onto second-tier
//! refiners: a per-origin (1:1) table, or a full cross product. The policy
//! is explicit configuration, never inferred from backend naming.

use crate::core::backend::BackendId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How Stage-1 origins map to Stage-2 refiners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum RefinerMapping {
    /// One refiner per origin. Origins missing from the table are refined
    /// by themselves.
    PerOrigin {
        #[serde(default)]
        table: HashMap<BackendId, BackendId>,
    },
    /// Every refiner reworks every origin draft (M × N matrix).
    CrossProduct { refiners: Vec<BackendId> },
}

impl RefinerMapping {
    /// 1:1 mapping with an explicit table.
    pub fn per_origin(table: HashMap<BackendId, BackendId>) -> Self {
        Self::PerOrigin { table }
    }

    /// Identity mapping: each origin refines its own draft.
    pub fn identity() -> Self {
        Self::PerOrigin {
            table: HashMap::new(),
        }
    }

    pub fn cross_product(refiners: Vec<BackendId>) -> Self {
        Self::CrossProduct { refiners }
    }

    /// The refiners assigned to one origin, in declaration order.
    pub fn refiners_for(&self, origin: &BackendId) -> Vec<BackendId> {
        match self {
            RefinerMapping::PerOrigin { table } => {
                vec![table.get(origin).cloned().unwrap_or_else(|| origin.clone())]
            }
            RefinerMapping::CrossProduct { refiners } => refiners.clone(),
        }
    }

    /// Number of Stage-2 pairs this mapping produces for `origins` drafts.
    pub fn pair_count(&self, origins: usize) -> usize {
        match self {
            RefinerMapping::PerOrigin { .. } => origins,
            RefinerMapping::CrossProduct { refiners } => origins * refiners.len(),
        }
    }
}

impl Default for RefinerMapping {
    fn default() -> Self {
        Self::identity()
    }
}
