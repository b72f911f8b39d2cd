//! Invocation request/response types shared by every backend protocol.
//!
//! One [`InvocationRequest`] describes a single prompt turn sent to one
//! backend: the ordered message turns, an optional image payload, and the
//! failure policy (timeout and retry budget) for the call. The request is
//! owned by the dispatching call and discarded once the call settles.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default per-attempt timeout for a backend call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default retry budget (total attempts) for a backend call.
pub const DEFAULT_RETRIES: u32 = 3;

/// Role of a message turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged message turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Image attached to a request.
///
/// Bytes and URL are mutually informative, not mutually exclusive: a
/// request may carry either or both, and each adapter picks whichever
/// form its protocol can express (fetching bytes for a URL through the
/// image source hook when it needs inline data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePayload {
    /// Raw image bytes, if available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<u8>>,
    /// MIME type of the bytes.
    pub mime_type: String,
    /// Reference URL, if available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ImagePayload {
    pub fn from_bytes(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data: Some(data),
            mime_type: mime_type.into(),
            url: None,
        }
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            data: None,
            mime_type: "image/jpeg".to_string(),
            url: Some(url.into()),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// One prompt turn sent to a backend
#[derive(Debug, Clone)]
pub struct InvocationRequest {
    /// Ordered message turns.
    pub messages: Vec<ChatMessage>,
    /// Optional image payload.
    pub image: Option<ImagePayload>,
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Total attempt budget (first try included).
    pub retries: u32,
}

impl InvocationRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            image: None,
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
        }
    }

    /// Convenience constructor for the common single-user-turn case.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self::new(vec![ChatMessage::user(prompt)])
    }

    pub fn with_image(mut self, image: Option<ImagePayload>) -> Self {
        self.image = image;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// The final user turn, if any. Adapters attach image segments here.
    pub fn last_user_message(&self) -> Option<&ChatMessage> {
        self.messages.iter().rev().find(|m| m.role == Role::User)
    }
}

/// Result of one settled backend invocation.
///
/// Produced by the dispatcher, consumed immediately by the stage that
/// requested it, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationOutcome {
    /// Extracted response text.
    pub content: String,
    /// Provider-side model name that actually served the call.
    pub backend_model: String,
}

impl InvocationOutcome {
    pub fn new(content: impl Into<String>, backend_model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            backend_model: backend_model.into(),
        }
    }
}
