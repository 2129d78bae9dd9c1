//! Context attachment for results

use super::types::{Error, Result};
use std::fmt::Display;

/// Prefix an error with what was being done when it occurred.
///
/// The error becomes [`Error::Configuration`] with the message
/// `"{context}: {error}"`.
pub trait ResultExt<T> {
    fn context(self, context: impl Display) -> Result<T>;

    /// Like [`context`](ResultExt::context), building the prefix only on error
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: Display,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn context(self, context: impl Display) -> Result<T> {
        self.with_context(|| context)
    }

    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        C: Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::configuration(format!("{}: {}", context(), e.into())))
    }
}
