//! Backend registry gateway.
//!
//! Maps backend identifiers to concrete provider adapters. The whole
//! table is built once from descriptors at configuration time; an
//! invocation resolves its identifier with a plain map lookup, and an
//! unknown identifier fails immediately and non-retryably.

use super::chat_completions::ChatCompletionsAdapter;
use super::generate_content::GenerateContentAdapter;
use super::ProviderAdapter;
use async_trait::async_trait;
use council_application::{BackendGateway, GatewayError, ImageSource};
use council_domain::{
    BackendDescriptor, BackendId, InvocationOutcome, InvocationRequest, ProviderKind,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

pub struct RegistryGateway {
    adapters: HashMap<BackendId, Arc<dyn ProviderAdapter>>,
}

impl RegistryGateway {
    /// Build one adapter per descriptor.
    ///
    /// The image source hook is shared by every adapter that may need to
    /// inline URL-referenced images.
    pub fn from_descriptors(
        descriptors: Vec<BackendDescriptor>,
        image_source: Option<Arc<dyn ImageSource>>,
    ) -> Self {
        let adapters = descriptors
            .into_iter()
            .map(|descriptor| {
                info!(
                    backend = %descriptor.id,
                    kind = %descriptor.kind,
                    model = %descriptor.model,
                    "Registering backend"
                );
                let id = descriptor.id.clone();
                let adapter: Arc<dyn ProviderAdapter> = match descriptor.kind {
                    ProviderKind::ChatCompletions => {
                        Arc::new(ChatCompletionsAdapter::new(descriptor))
                    }
                    ProviderKind::GenerateContent => Arc::new(GenerateContentAdapter::new(
                        descriptor,
                        image_source.clone(),
                    )),
                };
                (id, adapter)
            })
            .collect();

        Self { adapters }
    }

    /// Build a registry from pre-constructed adapters (used by tests).
    pub fn from_adapters(adapters: HashMap<BackendId, Arc<dyn ProviderAdapter>>) -> Self {
        Self { adapters }
    }

    /// All registered backend identifiers.
    pub fn backend_ids(&self) -> Vec<&BackendId> {
        self.adapters.keys().collect()
    }

    pub fn contains(&self, backend: &BackendId) -> bool {
        self.adapters.contains_key(backend)
    }
}

#[async_trait]
impl BackendGateway for RegistryGateway {
    async fn invoke(
        &self,
        backend: &BackendId,
        request: &InvocationRequest,
    ) -> Result<InvocationOutcome, GatewayError> {
        let adapter = self
            .adapters
            .get(backend)
            .ok_or_else(|| GatewayError::UnknownBackend(backend.clone()))?;
        adapter.complete(request).await
    }
}
