//! Fluent registration on shared resources

use crate::binding::Parent;
use crate::context::LifetimeContext;
use crate::releasable::LifetimeObject;
use lifeguard_core::Result;
use std::any::Any;
use std::sync::Arc;

/// Register a resource with a context where it is created.
///
/// ```
/// use lifeguard_lifetime::{HoldLifetime, LifetimeContext, LifetimeObject, Releasable};
/// use lifeguard_core::{BoxError, ReleaseMode};
/// use std::sync::Arc;
///
/// struct Connection;
///
/// impl Releasable for Connection {
///     fn release(&self) -> Result<(), BoxError> {
///         Ok(())
///     }
/// }
///
/// impl LifetimeObject for Connection {
///     fn as_releasable(self: Arc<Self>) -> Option<Arc<dyn Releasable>> {
///         Some(self)
///     }
/// }
///
/// let mut ctx = LifetimeContext::new(ReleaseMode::Clean, Some("doc".into()));
/// let connection = Arc::new(Connection).hold_lifetime(&mut ctx)?;
/// ctx.teardown()?;
/// # drop(connection);
/// # Ok::<(), lifeguard_core::Error>(())
/// ```
pub trait HoldLifetime: Sized {
    /// Register `self` with `ctx` and return it unchanged
    fn hold_lifetime(self, ctx: &mut LifetimeContext) -> Result<Self>;

    /// Register `self` with `ctx` under `parent` and return it unchanged
    fn hold_lifetime_with<P>(self, ctx: &mut LifetimeContext, parent: Arc<P>) -> Result<Self>
    where
        P: Any + Send + Sync;
}

impl<T: LifetimeObject> HoldLifetime for Arc<T> {
    fn hold_lifetime(self, ctx: &mut LifetimeContext) -> Result<Self> {
        ctx.register(Some(self), None)
    }

    fn hold_lifetime_with<P>(self, ctx: &mut LifetimeContext, parent: Arc<P>) -> Result<Self>
    where
        P: Any + Send + Sync,
    {
        ctx.register(Some(self), Some(Parent::new(parent)))
    }
}
