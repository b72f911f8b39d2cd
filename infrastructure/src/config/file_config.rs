//! Configuration file schema (`council.toml`).
//!
//! Example configuration:
//!
//! ```toml
//! [backends.scholar_gpt]
//! provider = "chat_completions"
//! model = "gpt-4o-mini"
//! api_key_env = "OPENAI_API_KEY"
//! base_url = "https://api.openai.com/v1/chat/completions"
//!
//! [backends.artist_gemini]
//! provider = "generate_content"
//! model = "gemini-flash-latest"
//! api_key_env = "GEMINI_API_KEY"
//! base_url = "https://generativelanguage.googleapis.com/v1beta/models"
//!
//! [council]
//! family = "outpainting"
//! members = ["scholar_gpt", "artist_gemini"]
//! chairman = "artist_gemini"
//!
//! [council.refiners]
//! mode = "per_origin"
//! table = { scholar_gpt = "artist_gemini" }
//!
//! [execution]
//! timeout_secs = 60
//! retries = 3
//! ```

use council_application::CouncilSettings;
use council_domain::{BackendDescriptor, BackendId, ProviderKind, RefinerMapping};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Errors turning file configuration into runtime values
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Backend '{backend}' has an unknown provider kind: {value}")]
    UnknownProvider { backend: String, value: String },

    #[error("Backend '{backend}' has no credential (set {env} or api_key)")]
    MissingCredential { backend: String, env: String },

    #[error("Council member '{0}' is not a configured backend")]
    UnknownMember(String),

    #[error("No council members configured")]
    NoMembers,
}

/// One `[backends.<id>]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileBackendConfig {
    /// Provider kind: "chat_completions" (alias "openai") or
    /// "generate_content" (alias "google").
    pub provider: String,
    /// Provider-side model name.
    pub model: String,
    /// Environment variable holding the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Direct API key (takes precedence over api_key_env).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Endpoint base URL.
    pub base_url: String,
}

/// `[council.refiners]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRefinerConfig {
    /// "per_origin" or "cross".
    pub mode: String,
    /// Origin -> refiner table for per_origin mode.
    pub table: HashMap<String, String>,
    /// Refiner list for cross mode.
    pub refiners: Vec<String>,
}

impl Default for FileRefinerConfig {
    fn default() -> Self {
        Self {
            mode: "per_origin".to_string(),
            table: HashMap::new(),
            refiners: Vec::new(),
        }
    }
}

impl FileRefinerConfig {
    pub fn to_mapping(&self) -> RefinerMapping {
        match self.mode.as_str() {
            "cross" => RefinerMapping::cross_product(
                self.refiners.iter().map(|r| BackendId::new(r.clone())).collect(),
            ),
            _ => RefinerMapping::per_origin(
                self.table
                    .iter()
                    .map(|(origin, refiner)| {
                        (BackendId::new(origin.clone()), BackendId::new(refiner.clone()))
                    })
                    .collect(),
            ),
        }
    }
}

/// `[council]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCouncilConfig {
    /// Task family: "outpainting" or "story".
    pub family: String,
    /// First-tier backends, in stage-1 order.
    pub members: Vec<String>,
    /// Judge backend (defaults to the first member).
    pub chairman: Option<String>,
    /// Refiner mapping policy.
    pub refiners: FileRefinerConfig,
}

impl Default for FileCouncilConfig {
    fn default() -> Self {
        Self {
            family: "outpainting".to_string(),
            members: Vec::new(),
            chairman: None,
            refiners: FileRefinerConfig::default(),
        }
    }
}

/// `[execution]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    /// Per-attempt timeout in seconds.
    pub timeout_secs: u64,
    /// Retry budget (total attempts) per invocation.
    pub retries: u32,
}

impl Default for FileExecutionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            retries: 3,
        }
    }
}

/// `[storage]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    /// Directory for conversation JSON files.
    pub data_dir: String,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "data/conversations".to_string(),
        }
    }
}

/// Complete configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub backends: HashMap<String, FileBackendConfig>,
    pub council: FileCouncilConfig,
    pub execution: FileExecutionConfig,
    pub storage: FileStorageConfig,
}

impl FileConfig {
    /// Resolve the backend registry into descriptors.
    ///
    /// Credentials are read here, exactly once, so nothing downstream
    /// touches the environment.
    pub fn to_descriptors(&self) -> Result<Vec<BackendDescriptor>, ConfigError> {
        let mut descriptors: Vec<BackendDescriptor> = Vec::with_capacity(self.backends.len());

        for (id, backend) in &self.backends {
            let kind: ProviderKind =
                backend
                    .provider
                    .parse()
                    .map_err(|_| ConfigError::UnknownProvider {
                        backend: id.clone(),
                        value: backend.provider.clone(),
                    })?;

            let api_key = match (&backend.api_key, &backend.api_key_env) {
                (Some(key), _) => key.clone(),
                (None, Some(env)) => std::env::var(env).map_err(|_| {
                    ConfigError::MissingCredential {
                        backend: id.clone(),
                        env: env.clone(),
                    }
                })?,
                (None, None) => {
                    return Err(ConfigError::MissingCredential {
                        backend: id.clone(),
                        env: "<unset>".to_string(),
                    });
                }
            };

            descriptors.push(BackendDescriptor {
                id: BackendId::new(id.clone()),
                kind,
                model: backend.model.clone(),
                api_key,
                base_url: backend.base_url.clone(),
            });
        }

        // Deterministic registry order regardless of map iteration.
        descriptors.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        Ok(descriptors)
    }

    /// Resolve the `[council]` section into runtime settings.
    pub fn to_settings(&self) -> Result<CouncilSettings, ConfigError> {
        if self.council.members.is_empty() {
            return Err(ConfigError::NoMembers);
        }
        for member in &self.council.members {
            if !self.backends.contains_key(member) {
                return Err(ConfigError::UnknownMember(member.clone()));
            }
        }

        let members: Vec<BackendId> = self
            .council
            .members
            .iter()
            .map(|m| BackendId::new(m.clone()))
            .collect();
        let chairman = self
            .council
            .chairman
            .as_ref()
            .map(|c| BackendId::new(c.clone()))
            .unwrap_or_else(|| members[0].clone());

        Ok(
            CouncilSettings::new(members, chairman)
                .with_refiners(self.council.refiners.to_mapping())
                .with_timeout(Duration::from_secs(self.execution.timeout_secs))
                .with_retries(self.execution.retries),
        )
    }
}
