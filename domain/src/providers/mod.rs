//! Backend registry types (provider-neutral, defined at configuration time).
//!
//! A [`BackendDescriptor`] binds one registered backend identifier to a
//! concrete provider protocol, model name, credential, and endpoint. The
//! registry is assembled once at process start and is read-only afterwards.

use crate::core::backend::BackendId;
use serde::{Deserialize, Serialize};

/// Wire protocol spoken by a backend (closed set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// OpenAI-style chat completions: messages array, multimodal content
    /// as an ordered list of typed segments on the final user turn.
    ChatCompletions,
    /// Google-style generateContent: role-tagged content blocks with
    /// typed parts, no first-class system role, inline base64 images.
    GenerateContent,
}

impl ProviderKind {
    pub fn as_str(&self) -> &str {
        match self {
            ProviderKind::ChatCompletions => "chat_completions",
            ProviderKind::GenerateContent => "generate_content",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat_completions" | "openai" | "openai_compatible" => {
                Ok(ProviderKind::ChatCompletions)
            }
            "generate_content" | "google" => Ok(ProviderKind::GenerateContent),
            other => Err(format!("unknown provider kind: {other}")),
        }
    }
}

/// One registered backend endpoint.
///
/// Immutable after configuration; credentials are resolved (e.g. from the
/// environment) during assembly so inner components never read ambient
/// state.
#[derive(Debug, Clone)]
pub struct BackendDescriptor {
    /// Registry identifier, e.g. "scholar_gpt".
    pub id: BackendId,
    /// Which wire protocol the endpoint speaks.
    pub kind: ProviderKind,
    /// Provider-side model name, e.g. "gpt-4o-mini".
    pub model: String,
    /// API credential.
    pub api_key: String,
    /// Endpoint base URL.
    pub base_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parse_aliases() {
        assert_eq!(
            "openai".parse::<ProviderKind>().unwrap(),
            ProviderKind::ChatCompletions
        );
        assert_eq!(
            "openai_compatible".parse::<ProviderKind>().unwrap(),
            ProviderKind::ChatCompletions
        );
        assert_eq!(
            "google".parse::<ProviderKind>().unwrap(),
            ProviderKind::GenerateContent
        );
        assert!("cohere".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_provider_kind_roundtrip() {
        for kind in [ProviderKind::ChatCompletions, ProviderKind::GenerateContent] {
            let parsed: ProviderKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }
}
