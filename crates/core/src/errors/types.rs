//! Core error type definitions

use std::path::PathBuf;

/// Result type alias for lifeguard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by release capabilities
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Core error type for lifeguard operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A resource could not be registered with a lifetime context
    #[error("invalid lifetime object: {message}")]
    InvalidLifetimeObject { message: String },

    /// Releasing the resources of a test failed
    #[error("teardown of test '{test_name}' failed ({failures} failed release(s)): {source}")]
    TestTeardown {
        test_name: String,
        failures: usize,
        #[source]
        source: BoxError,
    },

    /// Registration attempted on a context that was already torn down
    #[error("lifetime context of test '{test_name}' is already disposed")]
    ContextDisposed { test_name: String },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// File system operations
    #[error("file system {operation} operation failed for '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Paths rejected before touching the file system
    #[error("invalid path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}
