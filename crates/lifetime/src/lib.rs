//! Test-time resource lifetime tracking
//!
//! Resources created while a test runs are registered with a
//! [`LifetimeContext`] and released in reverse registration order when the
//! test ends. A resource is released either through its own [`Releasable`]
//! implementation or through a [`LifetimeGuardian`] bound to its type.
//! Guardians are published in [`GuardianCatalog`]s and resolved lazily by the
//! [`WrapperRegistry`].
//!
//! ```
//! use lifeguard_lifetime::{with_lifetime_context, LifetimeObject, Releasable};
//! use lifeguard_core::{BoxError, ReleaseMode};
//! use std::sync::Arc;
//!
//! struct Scratch;
//!
//! impl Releasable for Scratch {
//!     fn release(&self) -> Result<(), BoxError> {
//!         Ok(())
//!     }
//! }
//!
//! impl LifetimeObject for Scratch {
//!     fn as_releasable(self: Arc<Self>) -> Option<Arc<dyn Releasable>> {
//!         Some(self)
//!     }
//! }
//!
//! with_lifetime_context(ReleaseMode::Clean, |ctx| {
//!     ctx.track(Scratch).map(|_| ())
//! })??;
//! # Ok::<(), lifeguard_core::Error>(())
//! ```

pub mod binding;
pub mod context;
pub mod extensions;
pub mod registry;
pub mod releasable;

pub use binding::{Construction, Erased, GuardianBinding, LifetimeGuardian, Parent, ParentForm};
pub use context::{
    with_lifetime_context, LifetimeContext, LifetimeContextBuilder, ReleasePanic,
};
pub use extensions::HoldLifetime;
pub use lifeguard_core::ReleaseMode;
pub use registry::{source_of, GuardianCatalog, WrapperRegistry};
pub use releasable::{LifetimeObject, ReleaseFn, Releasable};
