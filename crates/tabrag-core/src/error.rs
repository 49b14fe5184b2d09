//! Error types shared across the tabrag workspace

use thiserror::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Custom error types for ingestion and query flows
#[derive(Error, Debug)]
pub enum Error {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Event bus error: {0}")]
    Bus(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Configuration(err.to_string())
    }
}

impl Error {
    /// True for failures caused by the caller's input rather than a
    /// collaborator, used to pick exit codes and log levels.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::Schema(_) | Error::EmptyInput(_) | Error::Parse(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category_and_detail() {
        let err = Error::Schema("missing column 'rating'".to_string());
        assert_eq!(err.to_string(), "Schema error: missing column 'rating'");

        let err = Error::VectorStore("upsert rejected".to_string());
        assert_eq!(err.to_string(), "Vector store error: upsert rejected");
    }

    #[test]
    fn input_errors_are_classified() {
        assert!(Error::Schema("x".to_string()).is_input_error());
        assert!(Error::EmptyInput("x".to_string()).is_input_error());
        assert!(Error::Parse("x".to_string()).is_input_error());
        assert!(!Error::Embedding("x".to_string()).is_input_error());
        assert!(!Error::Cache("x".to_string()).is_input_error());
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
