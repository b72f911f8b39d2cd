//! Configuration loading and schema

pub mod file_config;
pub mod loader;

pub use file_config::{
    ConfigError, FileBackendConfig, FileConfig, FileCouncilConfig, FileExecutionConfig,
    FileRefinerConfig, FileStorageConfig,
};
pub use loader::ConfigLoader;
