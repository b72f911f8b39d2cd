//! Backend gateway port
//!
//! Defines the interface for invoking one registered backend. The
//! implementation (registry plus provider adapters) lives in the
//! infrastructure layer; the dispatcher is the only caller.

use async_trait::async_trait;
use council_domain::{BackendId, InvocationOutcome, InvocationRequest};
use thiserror::Error;

/// Errors a backend invocation can fail with
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Unknown backend: {0}")]
    UnknownBackend(BackendId),

    #[error("Rate limited by provider")]
    RateLimited,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Timeout")]
    Timeout,
}

impl GatewayError {
    /// Only the provider's explicit rate-limit signal is transient;
    /// everything else fails the invocation on the spot.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::RateLimited)
    }
}

/// Gateway for backend invocations
///
/// One call in, one outcome (or typed error) out. Implementations
/// resolve the backend identifier to a concrete provider adapter built at
/// configuration time.
#[async_trait]
pub trait BackendGateway: Send + Sync {
    async fn invoke(
        &self,
        backend: &BackendId,
        request: &InvocationRequest,
    ) -> Result<InvocationOutcome, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_rate_limit_is_retryable() {
        assert!(GatewayError::RateLimited.is_retryable());
        assert!(!GatewayError::Timeout.is_retryable());
        assert!(!GatewayError::UnknownBackend(BackendId::new("x")).is_retryable());
        assert!(!GatewayError::Connection("refused".into()).is_retryable());
        assert!(!GatewayError::Protocol("bad envelope".into()).is_retryable());
        assert!(!GatewayError::RequestFailed("500".into()).is_retryable());
    }
}
