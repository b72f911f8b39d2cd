//! Result persistence port
//!
//! After a run completes, the council result is handed as an opaque
//! structured value to an external store, keyed by a caller-supplied
//! conversation identifier. The engine knows nothing about the storage
//! format.

use async_trait::async_trait;
use council_domain::CouncilResult;
use thiserror::Error;

/// Errors from the persistence hook
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Conversation not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persistence hook for completed runs
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn persist(
        &self,
        conversation_id: &str,
        result: &CouncilResult,
    ) -> Result<(), StoreError>;
}
