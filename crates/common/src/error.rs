//! Error types shared across NitePost crates.

use std::path::PathBuf;

/// Top-level error type for NitePost operations.
#[derive(Debug, thiserror::Error)]
pub enum NiteError {
    #[error("Content error: {message}")]
    Content { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("Asset '{reference}' could not be resolved: {message}")]
    Asset { reference: String, message: String },

    #[error("Persistence error: {message}")]
    Persistence { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Superseded by a newer request (generation {newer})")]
    Superseded { newer: u64 },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using NiteError.
pub type NiteResult<T> = Result<T, NiteError>;

impl NiteError {
    pub fn content(msg: impl Into<String>) -> Self {
        Self::Content {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    pub fn asset(reference: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Asset {
            reference: reference.into(),
            message: msg.into(),
        }
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error only means a newer request replaced the one that failed.
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_error_message_names_reference() {
        let err = NiteError::asset("bg/club.jpg", "not found");
        assert_eq!(
            err.to_string(),
            "Asset 'bg/club.jpg' could not be resolved: not found"
        );
    }

    #[test]
    fn test_superseded_detection() {
        assert!(NiteError::Superseded { newer: 3 }.is_superseded());
        assert!(!NiteError::export("boom").is_superseded());
    }
}
