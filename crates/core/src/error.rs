//! Error types for MediaDispatch Core

use thiserror::Error;

use crate::capabilities::PropertyId;

/// Result type alias for MediaDispatch Core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while configuring or negotiating implementations
#[derive(Debug, Error)]
pub enum Error {
    /// Unknown property path or property index
    #[error("Property not found: {0}")]
    NotFound(String),

    /// Value type disagrees with the property's declared type
    #[error("Type mismatch for {property}: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Property that rejected the value
        property: PropertyId,
        /// Declared type of the property
        expected: &'static str,
        /// Type of the supplied value
        actual: &'static str,
    },

    /// Null reference supplied for a property that stores owned data
    #[error("Null pointer supplied for {0}")]
    NullPointer(PropertyId),

    /// A capability category is declared but has no usable combinations
    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    /// Candidate implementation does not satisfy the requested configuration
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Negotiation manifest could not be applied
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
