//! Error types for the Ethos profiling engine
//!
//! This module provides comprehensive error handling using thiserror for
//! structured error definitions and anyhow for error propagation.

use thiserror::Error;

/// Main error type for Ethos operations
#[derive(Error, Debug)]
pub enum EthosError {
    /// Message store operation failed (read or write)
    #[error("Store error: {0}")]
    Store(String),

    /// LLM API request failed or returned a non-conforming object
    #[error("LLM API error: {0}")]
    LlmApi(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for Ethos operations
pub type Result<T> = std::result::Result<T, EthosError>;

/// Convert anyhow::Error to EthosError
impl From<anyhow::Error> for EthosError {
    fn from(err: anyhow::Error) -> Self {
        EthosError::Other(err.to_string())
    }
}

impl From<toml::de::Error> for EthosError {
    fn from(err: toml::de::Error) -> Self {
        EthosError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EthosError::Store("connection refused".to_string());
        assert_eq!(err.to_string(), "Store error: connection refused");
    }

    #[test]
    fn test_error_conversion() {
        let anyhow_err = anyhow::anyhow!("something went sideways");
        let err: EthosError = anyhow_err.into();
        assert!(matches!(err, EthosError::Other(_)));
        assert_eq!(err.to_string(), "something went sideways");
    }
}
