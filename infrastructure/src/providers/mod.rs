//! Provider adapters
//!
//! Each adapter speaks one wire protocol and converts the shared
//! [`InvocationRequest`] shape into that protocol's request/response
//! envelope. Adapters are built once from descriptors at assembly time
//! and registered in the [`RegistryGateway`]; nothing re-dispatches on a
//! provider-kind string per call.

pub mod chat_completions;
pub mod generate_content;
pub mod registry;

pub use chat_completions::ChatCompletionsAdapter;
pub use generate_content::GenerateContentAdapter;
pub use registry::RegistryGateway;

use async_trait::async_trait;
use council_application::GatewayError;
use council_domain::{InvocationOutcome, InvocationRequest, ProviderKind};

/// Uniform interface to one generative-model provider
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Which wire protocol this adapter speaks.
    fn kind(&self) -> ProviderKind;

    /// Produce exactly one outcome, or fail with a typed error.
    async fn complete(
        &self,
        request: &InvocationRequest,
    ) -> Result<InvocationOutcome, GatewayError>;
}

/// Sentinel text for a structurally valid envelope with nothing
/// extractable in it. A weak candidate, not a failure.
pub(crate) fn empty_response_sentinel(model: &str) -> String {
    format!("Error: empty response from {model}")
}

/// Map an HTTP status to the gateway error taxonomy. Only 429 is
/// classified transient.
pub(crate) fn status_error(status: reqwest::StatusCode) -> GatewayError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        GatewayError::RateLimited
    } else {
        GatewayError::RequestFailed(format!(
            "HTTP {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        ))
    }
}
