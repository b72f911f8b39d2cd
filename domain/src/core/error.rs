//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("No backends configured for the council")]
    NoBackends,

    #[error("All backends failed to respond in stage 1")]
    AllBackendsFailed,

    #[error("No candidates available for adjudication")]
    NoCandidates,

    #[error("Invalid task query: {0}")]
    InvalidQuery(String),

    #[error("Invalid backend: {0}")]
    InvalidBackend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_backends_failed_display() {
        let error = DomainError::AllBackendsFailed;
        assert_eq!(
            error.to_string(),
            "All backends failed to respond in stage 1"
        );
    }

    #[test]
    fn test_invalid_backend_display() {
        let error = DomainError::InvalidBackend("scholar_gpt".to_string());
        assert!(error.to_string().contains("scholar_gpt"));
    }
}
