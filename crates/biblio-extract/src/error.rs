//! Error types for the extraction pipeline
//!
//! Every variant is fatal to the run. Only the transient ones are retried
//! first, see [`ExtractError::is_transient`].

use thiserror::Error;

/// Result type alias for extraction operations
pub type Result<T> = std::result::Result<T, ExtractError>;

#[derive(Error, Debug)]
pub enum ExtractError {
    /// Required parameter missing or invalid; raised before any request
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level failure (connect, timeout, truncated body)
    #[error("Network request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// 5xx or 429 from the API
    #[error("API temporarily unavailable ({status}) for {url}")]
    Unavailable { status: u16, url: String },

    /// Any other non-2xx status, e.g. a rejected filter
    #[error("API rejected request ({status}) for {url}: {message}")]
    Status {
        status: u16,
        url: String,
        message: String,
    },

    #[error("Request failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        source: Box<ExtractError>,
    },

    /// Response or record did not have the expected shape
    #[error("Unexpected data shape: {0}")]
    DataShape(String),

    #[error("Pagination error: {0}")]
    Pagination(String),

    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Table rendering failed: {0}")]
    Table(#[from] biblio_common::BiblioError),
}

impl ExtractError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn data_shape(msg: impl Into<String>) -> Self {
        Self::DataShape(msg.into())
    }

    pub fn pagination(msg: impl Into<String>) -> Self {
        Self::Pagination(msg.into())
    }

    /// Whether another attempt of the same request could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ExtractError::Http(err) => {
                err.is_timeout() || err.is_connect() || err.is_request() || err.is_body()
            },
            ExtractError::Unavailable { .. } => true,
            _ => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let unavailable = ExtractError::Unavailable {
            status: 503,
            url: "http://api/works".into(),
        };
        assert!(unavailable.is_transient());

        let rejected = ExtractError::Status {
            status: 400,
            url: "http://api/works".into(),
            message: "Invalid filter".into(),
        };
        assert!(!rejected.is_transient());
        assert!(!ExtractError::data_shape("missing id").is_transient());
        assert!(!ExtractError::config("ISSN is required").is_transient());
    }

    #[test]
    fn test_retries_exhausted_names_attempts() {
        let err = ExtractError::RetriesExhausted {
            attempts: 5,
            source: Box::new(ExtractError::Unavailable {
                status: 502,
                url: "http://api/works".into(),
            }),
        };
        let message = err.to_string();
        assert!(message.contains("5 attempts"));
        assert!(message.contains("502"));
    }
}
