//! Error types for glyphweave-core

use thiserror::Error;

/// Result type alias for glyphweave-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in glyphweave-core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file could not be found
    #[error("configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was searched
        path: String,
    },

    /// Failed to parse YAML configuration
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// Invalid configuration value
    #[error("invalid configuration: {message}")]
    ConfigInvalid {
        /// Description of what's invalid
        message: String,
    },

    /// Icon metadata could not be found
    #[error("icon metadata not found: {path}")]
    MetadataNotFound {
        /// Path that was searched
        path: String,
    },

    /// Banner template rendering error
    #[error("banner template error: {0}")]
    TemplateError(#[from] minijinja::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
