//! Error types for snapshot validation.
//!
//! Only [`ValidateError::Schema`] is fatal to the comparison core. Missing
//! optional fields are absorbed through defaults during normalization, and
//! ratio computations guard their denominators instead of failing.
//!
//! The imperative shell works in `anyhow::Result` and converts any error into
//! the minimal valid report (see [`crate::validation::ValidationReport::failure`]).

use std::path::PathBuf;
use thiserror::Error;

/// Error type for the validation pipeline.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// The document is not a recognizable debt report.
    ///
    /// Raised for invalid JSON, a non-object root, or a missing or non-array
    /// item container. No partial normalization is ever returned.
    #[error("Schema error in {source_name}: {message}")]
    Schema {
        source_name: String,
        message: String,
    },

    /// File system errors while reading snapshots or writing reports
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration values
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ValidateError {
    /// Create a schema error for the named document.
    pub fn schema(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error came from an unrecognized document shape.
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }
}

/// Result alias for the validation core.
pub type Result<T> = std::result::Result<T, ValidateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_display_names_source() {
        let err = ValidateError::schema("before.json", "missing 'items' key");
        assert_eq!(
            err.to_string(),
            "Schema error in before.json: missing 'items' key"
        );
        assert!(err.is_schema());
    }

    #[test]
    fn test_io_error_display_names_path() {
        let err = ValidateError::io(
            "/tmp/missing.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );
        let message = err.to_string();
        assert!(message.contains("/tmp/missing.json"));
        assert!(!err.is_schema());
    }

    #[test]
    fn test_anyhow_conversion_preserves_message() {
        let err: anyhow::Error = ValidateError::Config("bad thresholds".to_string()).into();
        assert_eq!(err.to_string(), "Configuration error: bad thresholds");
    }
}
