//! HTTP image acquisition.
//!
//! Implements the [`ImageSource`] port: fetch image bytes for a URL so a
//! protocol that needs inline data can use URL-only requests. Responses
//! are capped in size; the MIME type comes from the Content-Type header
//! with a JPEG fallback.

use async_trait::async_trait;
use council_application::{ImageSource, ImageSourceError};
use tracing::debug;

/// Maximum image body size (10 MB)
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Image fetcher over HTTP
pub struct HttpImageSource {
    client: reqwest::Client,
    max_bytes: usize,
}

impl HttpImageSource {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            max_bytes: MAX_IMAGE_BYTES,
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

impl Default for HttpImageSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &str) -> Result<(Vec<u8>, String), ImageSourceError> {
        debug!(url, "Fetching image bytes");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ImageSourceError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageSourceError::Fetch(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        if let Some(length) = response.content_length()
            && length > self.max_bytes as u64
        {
            return Err(ImageSourceError::TooLarge(length as usize));
        }

        let mime_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| "image/jpeg".to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageSourceError::Fetch(e.to_string()))?;

        if bytes.len() > self.max_bytes {
            return Err(ImageSourceError::TooLarge(bytes.len()));
        }

        Ok((bytes.to_vec(), mime_type))
    }
}
