//! Infrastructure layer for llm-council
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: provider adapters and the backend registry,
//! configuration file loading, conversation storage, and HTTP image
//! acquisition.

pub mod config;
pub mod images;
pub mod providers;
pub mod storage;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, FileConfig};
pub use images::HttpImageSource;
pub use providers::{
    ChatCompletionsAdapter, GenerateContentAdapter, ProviderAdapter, RegistryGateway,
};
pub use storage::{Conversation, ConversationSummary, JsonConversationStore};
