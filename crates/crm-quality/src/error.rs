//! Error types for the data-quality engine.
//!
//! Only two kinds of problems are faults here: a record source that cannot
//! deliver a batch, and a configuration that would produce nonsensical
//! scores. Missing fields and outliers are the subject of the engine and are
//! always represented as [`Issue`](crate::types::Issue) values instead.
//!
//! Errors serialize as `{code, message}` so structured consumers (JSON
//! reports, chat renderers) can branch on the code.

use crate::config::ConfigValidationError;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for quality scans.
#[derive(Error, Debug)]
pub enum QualityError {
    /// The record source could not supply a batch for an object type.
    #[error("Records for '{object_type}' are unavailable: {reason}")]
    InputUnavailable { object_type: String, reason: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// A scan or lookup named an object type with no configured rules.
    #[error("No detection rules configured for object type '{0}'")]
    UnknownObjectType(String),

    /// Report generation failed.
    #[error("Failed to generate report: {0}")]
    ReportGenerationFailed(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<QualityError>,
    },
}

impl QualityError {
    /// Shorthand for an [`QualityError::InputUnavailable`] fault.
    pub fn unavailable(object_type: impl Into<String>, reason: impl ToString) -> Self {
        QualityError::InputUnavailable {
            object_type: object_type.into(),
            reason: reason.to_string(),
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        QualityError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for structured consumers.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InputUnavailable { .. } => "INPUT_UNAVAILABLE",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::UnknownObjectType(_) => "UNKNOWN_OBJECT_TYPE",
            Self::ReportGenerationFailed(_) => "REPORT_GENERATION_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error came from the record source.
    pub fn is_input_unavailable(&self) -> bool {
        match self {
            Self::InputUnavailable { .. } => true,
            Self::WithContext { source, .. } => source.is_input_unavailable(),
            _ => false,
        }
    }

    /// Check if a later attempt could succeed without changing the configuration.
    ///
    /// The engine never retries on its own; this only tells the caller
    /// whether retrying is worth it.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InputUnavailable { .. } | Self::Io(_) => true,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

impl Serialize for QualityError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("QualityError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for quality operations.
pub type Result<T> = std::result::Result<T, QualityError>;

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
        self.map_err(|e| QualityError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            QualityError::unavailable("Account", "connection refused").error_code(),
            "INPUT_UNAVAILABLE"
        );
        assert_eq!(
            QualityError::UnknownObjectType("Lead".to_string()).error_code(),
            "UNKNOWN_OBJECT_TYPE"
        );
    }

    #[test]
    fn test_config_error_converts() {
        let error: QualityError = ConfigValidationError::InvalidZScore(0.0).into();
        assert_eq!(error.error_code(), "INVALID_CONFIG");
        assert!(!error.is_recoverable());
    }

    #[test]
    fn test_is_recoverable() {
        assert!(QualityError::unavailable("Account", "timeout").is_recoverable());
        assert!(!QualityError::UnknownObjectType("Lead".to_string()).is_recoverable());
    }

    #[test]
    fn test_error_serialization() {
        let error = QualityError::unavailable("Opportunity", "auth failed");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("INPUT_UNAVAILABLE"));
        assert!(json.contains("Opportunity"));
    }

    #[test]
    fn test_with_context() {
        let error = QualityError::unavailable("Account", "timeout")
            .with_context("Scanning Account (missing_phone)");
        assert!(error.to_string().contains("Scanning Account"));
        assert_eq!(error.error_code(), "INPUT_UNAVAILABLE"); // Code of the wrapped error
        assert!(error.is_input_unavailable());
        assert!(error.is_recoverable());
    }
}
