// File: ./src/source/file.rs
use crate::errors::{FetchErrorKind, FetchFailure};
use crate::source::TabularSource;
use async_trait::async_trait;
use std::io::ErrorKind;

#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

impl FileSource {
    fn classify(err: &std::io::Error, path: &str) -> FetchFailure {
        let message = format!("{}: {}", path, err);
        match err.kind() {
            ErrorKind::NotFound => FetchFailure::new(FetchErrorKind::NotFound, message),
            ErrorKind::PermissionDenied => FetchFailure::new(FetchErrorKind::Forbidden, message),
            ErrorKind::TimedOut => FetchFailure::new(FetchErrorKind::Timeout, message),
            _ => FetchFailure::from_message(message),
        }
    }
}

#[async_trait]
impl TabularSource for FileSource {
    async fn fetch_text(&self, locator: &str) -> Result<String, FetchFailure> {
        let path = locator.strip_prefix("file://").unwrap_or(locator);
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| Self::classify(&e, path))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
