//! Release capability shared by resources and their guardians

use lifeguard_core::BoxError;
use parking_lot::Mutex;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Anything that can be released once.
///
/// A lifetime context calls `release` at most once per registered entry.
/// Implementations reachable through other handles should tolerate a second
/// call themselves.
pub trait Releasable: Send + Sync {
    /// Release the underlying resource
    fn release(&self) -> Result<(), BoxError>;
}

impl<R: Releasable + ?Sized> Releasable for Arc<R> {
    fn release(&self) -> Result<(), BoxError> {
        (**self).release()
    }
}

impl<R: Releasable + ?Sized> Releasable for Box<R> {
    fn release(&self) -> Result<(), BoxError> {
        (**self).release()
    }
}

/// A value that may be registered with a lifetime context.
///
/// Types releasing themselves return `Some(self)` from [`as_releasable`];
/// everything else relies on a guardian registered for its exact type.
///
/// ```
/// use lifeguard_lifetime::{LifetimeObject, Releasable};
/// use std::sync::Arc;
///
/// struct Socket;
///
/// impl Releasable for Socket {
///     fn release(&self) -> Result<(), lifeguard_core::BoxError> {
///         Ok(())
///     }
/// }
///
/// impl LifetimeObject for Socket {
///     fn as_releasable(self: Arc<Self>) -> Option<Arc<dyn Releasable>> {
///         Some(self)
///     }
/// }
/// ```
///
/// [`as_releasable`]: LifetimeObject::as_releasable
pub trait LifetimeObject: Any + Send + Sync {
    /// The resource's own release capability, if it has one
    fn as_releasable(self: Arc<Self>) -> Option<Arc<dyn Releasable>> {
        None
    }
}

/// Adapter turning a one-shot closure into a [`Releasable`]
pub struct ReleaseFn<F> {
    release: Mutex<Option<F>>,
}

impl<F> ReleaseFn<F>
where
    F: FnOnce() -> Result<(), BoxError> + Send,
{
    pub fn new(release: F) -> Self {
        Self {
            release: Mutex::new(Some(release)),
        }
    }
}

impl<F> Releasable for ReleaseFn<F>
where
    F: FnOnce() -> Result<(), BoxError> + Send,
{
    fn release(&self) -> Result<(), BoxError> {
        // Runs at most once
        let release = self.release.lock().take();
        match release {
            Some(release) => release(),
            None => Ok(()),
        }
    }
}

impl<F> fmt::Debug for ReleaseFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseFn")
            .field("pending", &self.release.lock().is_some())
            .finish()
    }
}
