//! Chat-completions provider adapter (OpenAI-style wire format).
//!
//! Text-only requests send the messages array as plain strings. When an
//! image rides along, the final user turn's content becomes an ordered
//! segment list: the text segment first, then an `image_url` segment
//! carrying either the reference URL or a base64 data URL built from the
//! inline bytes. Inline bytes win when both forms are present.

use super::{ProviderAdapter, empty_response_sentinel, status_error};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use council_application::GatewayError;
use council_domain::{
    BackendDescriptor, ImagePayload, InvocationOutcome, InvocationRequest, ProviderKind, Role,
};
use serde_json::{Value, json};
use tracing::debug;

pub struct ChatCompletionsAdapter {
    client: reqwest::Client,
    descriptor: BackendDescriptor,
}

impl ChatCompletionsAdapter {
    pub fn new(descriptor: BackendDescriptor) -> Self {
        Self {
            client: reqwest::Client::new(),
            descriptor,
        }
    }
}

#[async_trait]
impl ProviderAdapter for ChatCompletionsAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::ChatCompletions
    }

    async fn complete(
        &self,
        request: &InvocationRequest,
    ) -> Result<InvocationOutcome, GatewayError> {
        let payload = build_payload(&self.descriptor.model, request);
        debug!(model = %self.descriptor.model, "Sending chat-completions request");

        let response = self
            .client
            .post(&self.descriptor.base_url)
            .bearer_auth(&self.descriptor.api_key)
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

/// Build the chat-completions request body.
pub(crate) fn build_payload(model: &str, request: &InvocationRequest) -> Value {
    let last_user = request
        .messages
        .iter()
        .rposition(|m| m.role == Role::User);

    let messages: Vec<Value> = request
        .messages
        .iter()
        .enumerate()
        .map(|(i, message)| {
            let role = role_name(message.role);
            // The image rides on the final user turn as a segment list.
            if Some(i) == last_user
                && let Some(segment) = request.image.as_ref().and_then(image_segment)
            {
                json!({
                    "role": role,
                    "content": [
                        {"type": "text", "text": message.content},
                        segment,
                    ],
                })
            } else {
                json!({"role": role, "content": message.content})
            }
        })
        .collect();

    json!({
        "model": model,
        "messages": messages,
        "temperature": 0.7,
    })
}

/// The image segment for the content list, or `None` when the payload
/// carries neither bytes nor a URL.
fn image_segment(image: &ImagePayload) -> Option<Value> {
    let url = match (&image.data, &image.url) {
        (Some(data), _) => format!(
            "data:{};base64,{}",
            image.mime_type,
            BASE64.encode(data)
        ),
        (None, Some(url)) => url.clone(),
        (None, None) => return None,
    };
    Some(json!({"type": "image_url", "image_url": {"url": url}}))
}

/// Pull the answer text out of the response envelope.
pub(crate) fn extract_text(body: &Value) -> Option<String> {
    body.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .map(str::to_string)
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::ChatMessage;

    fn text_request(prompt: &str) -> InvocationRequest {
        InvocationRequest::from_prompt(prompt)
    }

    #[test]
    fn test_payload_text_only() {
        let payload = build_payload("gpt-4o-mini", &text_request("expand this"));

        assert_eq!(payload["model"], "gpt-4o-mini");
        assert_eq!(payload["temperature"], 0.7);
        assert_eq!(payload["messages"][0]["role"], "user");
        assert_eq!(payload["messages"][0]["content"], "expand this");
    }

    #[test]
    fn test_payload_keeps_system_role() {
        let request = InvocationRequest::new(vec![
            ChatMessage::system("you are terse"),
            ChatMessage::user("hello"),
        ]);
        let payload = build_payload("m", &request);

        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(payload["messages"][1]["role"], "user");
    }

    #[test]
    fn test_payload_inline_bytes_become_data_url() {
        let request = text_request("describe")
            .with_image(Some(ImagePayload::from_bytes(vec![1, 2, 3], "image/png")));
        let payload = build_payload("m", &request);

        let content = &payload["messages"][0]["content"];
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[0]["text"], "describe");
        assert_eq!(content[1]["type"], "image_url");
        let url = content[1]["image_url"]["url"].as_str().unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_payload_url_only_passes_reference_through() {
        let request = text_request("describe")
            .with_image(Some(ImagePayload::from_url("https://example.com/a.jpg")));
        let payload = build_payload("m", &request);

        let url = payload["messages"][0]["content"][1]["image_url"]["url"]
            .as_str()
            .unwrap();
        assert_eq!(url, "https://example.com/a.jpg");
    }

    #[test]
    fn test_payload_prefers_bytes_over_url() {
        let image = ImagePayload::from_bytes(vec![9], "image/jpeg")
            .with_url("https://example.com/a.jpg");
        let request = text_request("describe").with_image(Some(image));
        let payload = build_payload("m", &request);

        let url = payload["messages"][0]["content"][1]["image_url"]["url"]
            .as_str()
            .unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_payload_image_attaches_to_final_user_turn() {
        let request = InvocationRequest::new(vec![
            ChatMessage::user("first"),
            ChatMessage::assistant("noted"),
            ChatMessage::user("second"),
        ])
        .with_image(Some(ImagePayload::from_url("https://example.com/a.jpg")));
        let payload = build_payload("m", &request);

        // Only the last user turn becomes a segment list.
        assert!(payload["messages"][0]["content"].is_string());
        assert!(payload["messages"][2]["content"].is_array());
    }

    #[test]
    fn test_extract_text() {
        let body = json!({
            "choices": [{"message": {"role": "assistant", "content": "the answer"}}]
        });
        assert_eq!(extract_text(&body).as_deref(), Some("the answer"));
    }

    #[test]
    fn test_extract_text_missing_content_is_none() {
        let body = json!({"choices": [{"message": {"role": "assistant"}}]});
        assert_eq!(extract_text(&body), None);

        let body = json!({"choices": []});
        assert_eq!(extract_text(&body), None);
    }
}
