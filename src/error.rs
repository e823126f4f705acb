use thiserror::Error;

/// Main error type for the extraction pipeline
///
/// Text extraction itself never fails; these errors come from catalog I/O,
/// configuration and profile decoding.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Catalog unreachable: {0}")]
    CatalogUnreachable(String),

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("Rate limit exceeded: retry after {retry_after}s")]
    RateLimit { retry_after: u64 },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ExtractError>;

impl ExtractError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExtractError::CatalogUnreachable(_)
                | ExtractError::RateLimit { .. }
                | ExtractError::Timeout(_)
        )
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            ExtractError::Config(_) => "CONFIG_ERROR",
            ExtractError::Serialization(_) => "SERIALIZATION_ERROR",
            ExtractError::Validation(_) => "VALIDATION_ERROR",
            ExtractError::Catalog(_) => "CATALOG_ERROR",
            ExtractError::CatalogUnreachable(_) => "CATALOG_UNREACHABLE",
            ExtractError::Timeout(_) => "TIMEOUT_ERROR",
            ExtractError::RateLimit { .. } => "RATE_LIMIT_ERROR",
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "retryable": self.is_retryable()
            }
        })
    }
}
