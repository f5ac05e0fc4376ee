//! Error types for code generation

use thiserror::Error;

/// Result type for codegen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during code generation and bundling
#[derive(Error, Debug)]
pub enum Error {
    /// Bucket capacity of zero
    #[error("bucket size must be greater than zero")]
    InvalidBucketSize,

    /// Two catalog variants share a module name
    #[error("duplicate module name '{module_name}' (filepaths '{first}' and '{second}')")]
    DuplicateModule {
        /// Colliding module name
        module_name: String,
        /// Filepath of the first job with this name
        first: String,
        /// Filepath of the later job with this name
        second: String,
    },

    /// A virtual path was written twice
    #[error("duplicate virtual file: {path}")]
    DuplicatePath {
        /// Colliding path
        path: String,
    },

    /// A virtual path escapes the package root
    #[error("invalid virtual path '{path}': must be relative and stay inside the package")]
    InvalidPath {
        /// Offending path
        path: String,
    },

    /// An entry point or import target is missing from the virtual file set
    #[error("virtual file not found: {path}")]
    MissingVirtualFile {
        /// Path that was referenced
        path: String,
    },

    /// The external bundler reported a failure
    #[error("bundling failed: {message}")]
    BundleError {
        /// Error message
        message: String,
        /// Bundler stderr output
        stderr: Option<String>,
    },

    /// Bundler program not found or not runnable
    #[error("bundler error: {message}. Ensure the configured bundler command is installed.")]
    ToolchainError {
        /// Error message
        message: String,
    },

    /// Pruning the output directories failed
    #[error("failed to prune {path}: {source}")]
    Cleanup {
        /// Directory being removed
        path: String,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Configuration error from glyphweave-core
    #[error(transparent)]
    Core(#[from] glyphweave_core::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
