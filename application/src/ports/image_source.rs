//! Image acquisition port
//!
//! When a request carries only an image URL and the chosen provider
//! protocol requires inline bytes, the adapter resolves the URL through
//! this externally injected hook instead of owning fetch logic itself.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from image acquisition
#[derive(Error, Debug)]
pub enum ImageSourceError {
    #[error("Image fetch failed: {0}")]
    Fetch(String),

    #[error("Image too large: {0} bytes")]
    TooLarge(usize),
}

/// Fetch-bytes-for-URL hook
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch image bytes for a URL, returning the bytes and their MIME type.
    async fn fetch(&self, url: &str) -> Result<(Vec<u8>, String), ImageSourceError>;
}
