//! Error types shared across the biblio workspace

use thiserror::Error;

/// Result type alias for common operations
pub type Result<T> = std::result::Result<T, BiblioError>;

/// Errors raised while rendering or fingerprinting tables
#[derive(Error, Debug)]
pub enum BiblioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer error: {0}")]
    CsvBuffer(String),
}

impl<W> From<csv::IntoInnerError<W>> for BiblioError {
    fn from(err: csv::IntoInnerError<W>) -> Self {
        BiblioError::CsvBuffer(err.error().to_string())
    }
}
