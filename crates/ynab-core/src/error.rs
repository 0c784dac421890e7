//! Error types for the YNAB MCP server

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error body returned by the YNAB API (`{"error": {"id", "name", "detail"}}`)
    #[error("YNAB API error {status} ({name}): {detail}")]
    Api {
        status: u16,
        name: String,
        detail: String,
    },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Build an upstream API error
    pub fn api(status: u16, name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Api {
            status,
            name: name.into(),
            detail: detail.into(),
        }
    }

    /// True when the upstream rejected the credential
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = Error::api(404, "not_found", "Resource not found");
        assert_eq!(
            err.to_string(),
            "YNAB API error 404 (not_found): Resource not found"
        );
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_unauthorized() {
        let err = Error::api(401, "unauthorized", "Unauthorized");
        assert!(err.is_unauthorized());
        assert!(!Error::Config("missing".into()).is_unauthorized());
    }
}
