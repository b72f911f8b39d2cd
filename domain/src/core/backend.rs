//! Backend identifier value object

use serde::{Deserialize, Serialize};

/// Identifier of one registered backend (Value Object)
///
/// Backends are registered under human-chosen identifiers such as
/// `"scholar_gpt"` or `"artist_gemini"`; every stage result and the final
/// selection reference backends by this identifier, never by provider
/// model name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendId(String);

impl BackendId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BackendId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BackendId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BackendId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_id_display() {
        let id = BackendId::new("scholar_gpt");
        assert_eq!(id.to_string(), "scholar_gpt");
        assert_eq!(id.as_str(), "scholar_gpt");
    }

    #[test]
    fn test_backend_id_serde_transparent() {
        let id = BackendId::new("artist_gemini");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"artist_gemini\"");

        let parsed: BackendId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
