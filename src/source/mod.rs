// File: ./src/source/mod.rs
// Retrieval of raw tabular text. Parsing happens in the loader.
pub mod file;
pub mod http;

pub use file::FileSource;
pub use http::HttpSource;

use crate::errors::FetchFailure;
use async_trait::async_trait;

#[async_trait]
pub trait TabularSource: Send + Sync {
    async fn fetch_text(&self, locator: &str) -> Result<String, FetchFailure>;
}

pub fn is_http_locator(locator: &str) -> bool {
    let lower = locator.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Routes `http(s)://` locators to the HTTP client and everything else to the filesystem.
#[derive(Debug, Clone)]
pub struct DefaultSource {
    file: FileSource,
    http: HttpSource,
}

impl DefaultSource {
    pub fn new(http: HttpSource) -> Self {
        Self {
            file: FileSource,
            http,
        }
    }
}

#[async_trait]
impl TabularSource for DefaultSource {
    async fn fetch_text(&self, locator: &str) -> Result<String, FetchFailure> {
        if is_http_locator(locator) {
            self.http.fetch_text(locator).await
        } else {
            self.file.fetch_text(locator).await
        }
    }
}
