//! Custom error types for the profiling pipeline.
//!
//! This module provides the crate-wide error hierarchy using `thiserror`.
//! Errors are serializable as `{code, message}` pairs so callers embedding
//! the library behind an API surface can forward them directly.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the profiling pipeline.
#[derive(Error, Debug)]
pub enum ProfilerError {
    /// File extension is not in the supported allow-list.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// File content could not be parsed into a table.
    #[error("Failed to load '{file}': {reason}")]
    Load { file: String, reason: String },

    /// A single model candidate failed. Caught internally by the router;
    /// only surfaced when the whole candidate list is exhausted.
    #[error("Provider '{provider}' failed: {reason}")]
    Provider { provider: String, reason: String },

    /// Every routed model candidate failed.
    #[error("All {attempted} model candidates failed. Last error: {last_error}")]
    AllProvidersFailed { attempted: usize, last_error: String },

    /// No provider is registered for a model identifier's prefix.
    #[error("No provider registered for model '{0}'")]
    UnknownProvider(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error (only with the "llm" feature).
    #[cfg(feature = "llm")]
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ProfilerError>,
    },
}

impl ProfilerError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ProfilerError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for programmatic handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::Load { .. } => "LOAD_ERROR",
            Self::Provider { .. } => "PROVIDER_ERROR",
            Self::AllProvidersFailed { .. } => "ALL_PROVIDERS_FAILED",
            Self::UnknownProvider(_) => "UNKNOWN_PROVIDER",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            #[cfg(feature = "llm")]
            Self::HttpRequest(_) => "HTTP_REQUEST_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check whether this error came out of the completion router.
    ///
    /// Router errors are downgraded at the insight-generation boundary
    /// instead of failing the report.
    pub fn is_provider_error(&self) -> bool {
        match self {
            Self::Provider { .. } | Self::AllProvidersFailed { .. } | Self::UnknownProvider(_) => {
                true
            }
            Self::WithContext { source, .. } => source.is_provider_error(),
            _ => false,
        }
    }
}

/// Serialize errors as a `{code, message}` struct.
impl Serialize for ProfilerError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ProfilerError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for profiling operations.
pub type Result<T> = std::result::Result<T, ProfilerError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ProfilerError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            ProfilerError::UnsupportedFormat(".zip".to_string()).error_code(),
            "UNSUPPORTED_FORMAT"
        );
        assert_eq!(
            ProfilerError::AllProvidersFailed {
                attempted: 2,
                last_error: "timeout".to_string()
            }
            .error_code(),
            "ALL_PROVIDERS_FAILED"
        );
    }

    #[test]
    fn test_is_provider_error() {
        assert!(
            ProfilerError::Provider {
                provider: "openai".to_string(),
                reason: "rate limit".to_string()
            }
            .is_provider_error()
        );
        assert!(!ProfilerError::UnsupportedFormat(".zip".to_string()).is_provider_error());
    }

    #[test]
    fn test_error_serialization() {
        let error = ProfilerError::Load {
            file: "data.csv".to_string(),
            reason: "bad header".to_string(),
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("LOAD_ERROR"));
        assert!(json.contains("data.csv"));
    }

    #[test]
    fn test_with_context() {
        let error = ProfilerError::UnsupportedFormat(".zip".to_string())
            .with_context("While sniffing upload");
        assert!(error.to_string().contains("While sniffing upload"));
        assert_eq!(error.error_code(), "UNSUPPORTED_FORMAT");
    }
}
