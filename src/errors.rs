// File: ./src/errors.rs
// Load-time error taxonomy.
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Why a source could not be retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FetchErrorKind {
    NotFound,
    Forbidden,
    CrossOrigin,
    Timeout,
    Unknown,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchErrorKind::NotFound => {
                write!(f, "CSV file not found. Check that the path is correct")
            }
            FetchErrorKind::Forbidden => write!(f, "No permission to access the CSV file"),
            FetchErrorKind::CrossOrigin => {
                write!(f, "CORS error: the server does not allow access to the CSV file")
            }
            FetchErrorKind::Timeout => write!(
                f,
                "The server took too long to respond. Try again later"
            ),
            FetchErrorKind::Unknown => write!(f, "Could not load the CSV file"),
        }
    }
}

impl FetchErrorKind {
    /// Classifies a transport failure from its status code (when there was a
    /// response) and its error text.
    pub fn classify(status: Option<u16>, message: &str) -> Self {
        let lower = message.to_lowercase();
        match status {
            Some(404) => return FetchErrorKind::NotFound,
            Some(401) | Some(403) => return FetchErrorKind::Forbidden,
            Some(408) | Some(504) => return FetchErrorKind::Timeout,
            _ => {}
        }
        if lower.contains("not found") {
            FetchErrorKind::NotFound
        } else if lower.contains("cors") || lower.contains("cross-origin") {
            FetchErrorKind::CrossOrigin
        } else if lower.contains("timeout") || lower.contains("timed out") {
            FetchErrorKind::Timeout
        } else if lower.contains("permission denied") || lower.contains("forbidden") {
            FetchErrorKind::Forbidden
        } else {
            FetchErrorKind::Unknown
        }
    }
}

/// Failure reported by a `TabularSource`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchFailure {
    pub kind: FetchErrorKind,
    pub status: Option<u16>,
    pub message: String,
}

impl FetchFailure {
    pub fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
        }
    }

    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: FetchErrorKind::classify(Some(status), &message),
            status: Some(status),
            message,
        }
    }

    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: FetchErrorKind::classify(None, &message),
            status: None,
            message,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("No CSV source was provided")]
    EmptySource,
    #[error("{kind} ({message})")]
    Fetch {
        kind: FetchErrorKind,
        message: String,
    },
    #[error("The server returned an HTML page instead of CSV")]
    HtmlPayload,
    #[error("Fatal error while parsing CSV: {0}")]
    ParseFailure(String),
    #[error("The CSV file is empty or contains no valid rows")]
    EmptyDataset,
}

impl LoadError {
    pub fn fetch_kind(&self) -> Option<FetchErrorKind> {
        match self {
            LoadError::Fetch { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<FetchFailure> for LoadError {
    fn from(value: FetchFailure) -> Self {
        LoadError::Fetch {
            kind: value.kind,
            message: value.message,
        }
    }
}

/// Non-fatal, row-level parse issue. Collected and logged, never fails a load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseWarning {
    pub line: Option<u64>,
    pub message: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_win_over_text() {
        assert_eq!(
            FetchErrorKind::classify(Some(404), "whatever"),
            FetchErrorKind::NotFound
        );
        assert_eq!(
            FetchErrorKind::classify(Some(401), ""),
            FetchErrorKind::Forbidden
        );
        assert_eq!(
            FetchErrorKind::classify(Some(403), "timeout"),
            FetchErrorKind::Forbidden
        );
    }

    #[test]
    fn transport_text_is_inspected() {
        assert_eq!(
            FetchErrorKind::classify(None, "Blocked by CORS policy"),
            FetchErrorKind::CrossOrigin
        );
        assert_eq!(
            FetchErrorKind::classify(None, "operation timed out"),
            FetchErrorKind::Timeout
        );
        assert_eq!(
            FetchErrorKind::classify(None, "File not found"),
            FetchErrorKind::NotFound
        );
        assert_eq!(
            FetchErrorKind::classify(Some(500), "boom"),
            FetchErrorKind::Unknown
        );
    }

    #[test]
    fn load_error_messages_name_the_subtype() {
        let err = LoadError::from(FetchFailure::from_status(404, "404 Not Found"));
        assert_eq!(err.fetch_kind(), Some(FetchErrorKind::NotFound));
        assert!(err.to_string().starts_with("CSV file not found"));
    }
}
