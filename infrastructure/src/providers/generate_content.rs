//! Generate-content provider adapter (Google-style wire format).
//!
//! The protocol has no first-class system role, so system turns fold
//! into user turns; assistant turns map to the "model" role. Images must
//! be inline: the base64 part goes *before* the text part within the
//! final user content block. When a request carries only a reference URL,
//! bytes are resolved through the injected image source hook.

use super::{ProviderAdapter, empty_response_sentinel, status_error};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use council_application::{GatewayError, ImageSource};
use council_domain::{
    BackendDescriptor, InvocationOutcome, InvocationRequest, ProviderKind, Role,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

pub struct GenerateContentAdapter {
    client: reqwest::Client,
    descriptor: BackendDescriptor,
    image_source: Option<Arc<dyn ImageSource>>,
}

impl GenerateContentAdapter {
    pub fn new(descriptor: BackendDescriptor, image_source: Option<Arc<dyn ImageSource>>) -> Self {
        Self {
            client: reqwest::Client::new(),
            descriptor,
            image_source,
        }
    }

    /// Resolve the request's image into an inline part, fetching bytes
    /// for a URL-only payload through the image source hook.
    async fn inline_image_part(
        &self,
        request: &InvocationRequest,
    ) -> Result<Option<Value>, GatewayError> {
        let Some(image) = &request.image else {
            return Ok(None);
        };

        if let Some(data) = &image.data {
            return Ok(Some(inline_data_part(data, &image.mime_type)));
        }

        let Some(url) = &image.url else {
            return Ok(None);
        };

        let Some(source) = &self.image_source else {
            return Err(GatewayError::RequestFailed(
                "image URL supplied but no image source configured".to_string(),
            ));
        };

        let (bytes, mime_type) = source
            .fetch(url)
            .await
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;
        Ok(Some(inline_data_part(&bytes, &mime_type)))
    }
}

#[async_trait]
impl ProviderAdapter for GenerateContentAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::GenerateContent
    }

    async fn complete(
        &self,
        request: &InvocationRequest,
    ) -> Result<InvocationOutcome, GatewayError> {
        let image_part = self.inline_image_part(request).await?;
        let payload = build_payload(request, image_part);
        debug!(model = %self.descriptor.model, "Sending generate-content request");

        let url = format!(
            "{}/{}:generateContent?key={}",
            self.descriptor.base_url, self.descriptor.model, self.descriptor.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| GatewayError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| GatewayError::Protocol(e.to_string()))?;

        let content = extract_text(&body)
            .unwrap_or_else(|| empty_response_sentinel(&self.descriptor.model));

        Ok(InvocationOutcome::new(content, self.descriptor.model.clone()))
    }
}

/// Build the generate-content request body.
pub(crate) fn build_payload(request: &InvocationRequest, image_part: Option<Value>) -> Value {
    let last_user = request
        .messages
        .iter()
        .rposition(|m| m.role == Role::User);

    let contents: Vec<Value> = request
        .messages
        .iter()
        .enumerate()
        .map(|(i, message)| {
            // No first-class system role: fold system turns into user.
            let role = match message.role {
                Role::System | Role::User => "user",
                Role::Assistant => "model",
            };

            let mut parts = Vec::new();
            if Some(i) == last_user
                && let Some(part) = &image_part
            {
                // Inline image part precedes the text part.
                parts.push(part.clone());
            }
            parts.push(json!({"text": message.content}));

            json!({"role": role, "parts": parts})
        })
        .collect();

    json!({
        "contents": contents,
        "generationConfig": {"temperature": 0.7},
    })
}

fn inline_data_part(data: &[u8], mime_type: &str) -> Value {
    json!({
        "inline_data": {
            "mime_type": mime_type,
            "data": BASE64.encode(data),
        }
    })
}

/// Pull the answer text out of the response envelope.
pub(crate) fn extract_text(body: &Value) -> Option<String> {
    body.get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
        .map(str::to_string)
}
