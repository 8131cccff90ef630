//! Error types for the gpsdb library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for gpsdb operations.
///
/// Every variant is fatal for the run that produced it. Row-level validation
/// problems are collected as findings instead and only surface here as
/// [`GpsError::ValidationFailed`] once the run has finished.
#[derive(Debug, Error)]
pub enum GpsError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An input file does not exist.
    #[error("File not found: {0}")]
    MissingFile(PathBuf),

    /// A table does not have the expected set of columns.
    #[error(
        "{table} does not match the expected schema (missing: [{}], unexpected: [{}]); incorrect or incompatible table is used",
        missing.join(", "),
        unexpected.join(", ")
    )]
    SchemaMismatch {
        table: String,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },

    /// Reference data is unreadable or malformed.
    #[error("Reference data error in '{path}': {message}")]
    Reference { path: PathBuf, message: String },

    /// Geocoding lookup failed.
    #[error("Geocoding error: {0}")]
    Geocode(String),

    /// A location has no coordinate and geocoding is disabled.
    #[error("No coordinate for location '{0}' and geocoding is disabled")]
    UnresolvedLocation(String),

    /// Validation completed with at least one error-level finding.
    #[error("Validation completed with {errors} error(s)")]
    ValidationFailed { errors: usize },

    /// Pipeline results could not be integrated.
    #[error("Integration error: {0}")]
    Integration(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GpsError {
    /// Wrap an IO error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GpsError::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a reference data error.
    pub fn reference(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        GpsError::Reference {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for gpsdb operations.
pub type Result<T> = std::result::Result<T, GpsError>;
