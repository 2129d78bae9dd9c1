//! Builder methods for creating errors with context

use super::types::{BoxError, Error};
use std::path::PathBuf;

impl Error {
    /// Create an invalid lifetime object error
    #[must_use]
    pub fn invalid_lifetime_object(message: impl Into<String>) -> Self {
        Error::InvalidLifetimeObject {
            message: message.into(),
        }
    }

    /// Create a teardown error wrapping the first release failure
    #[must_use]
    pub fn test_teardown(test_name: impl Into<String>, failures: usize, source: BoxError) -> Self {
        Error::TestTeardown {
            test_name: test_name.into(),
            failures,
            source,
        }
    }

    /// Create a disposed context error
    #[must_use]
    pub fn context_disposed(test_name: impl Into<String>) -> Self {
        Error::ContextDisposed {
            test_name: test_name.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Create an invalid path error
    #[must_use]
    pub fn invalid_path(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidPath {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether this error was raised while registering a resource
    #[must_use]
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidLifetimeObject { .. } | Error::ContextDisposed { .. }
        )
    }
}
