//! Declarative binding between a lifetime guardian and the type it guards
//!
//! A guardian is a [`Releasable`] adapter for a resource type that cannot
//! release itself. It names exactly one guarded type through
//! [`LifetimeGuardian::Guarded`] and declares up front whether it is built
//! from the resource alone, from the resource plus a parent, or either way.
//! Matching is by exact type identity; there is no supertype matching.

use crate::releasable::Releasable;
use lifeguard_core::{Error, Result};
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Type-erased shared value handed to guardian factories
pub type Erased = Arc<dyn Any + Send + Sync>;

type StandaloneFactory = Box<dyn Fn(Erased) -> Option<Box<dyn Releasable>> + Send + Sync>;
type ParentFactory = Box<dyn Fn(Erased, Erased) -> Option<Box<dyn Releasable>> + Send + Sync>;

/// A wrapper strategy releasing resources of type [`Self::Guarded`].
///
/// ```
/// use lifeguard_lifetime::{Construction, LifetimeGuardian, Releasable};
/// use std::sync::Arc;
///
/// struct Lease(u32);
///
/// struct LeaseGuardian(Arc<Lease>);
///
/// impl Releasable for LeaseGuardian {
///     fn release(&self) -> Result<(), lifeguard_core::BoxError> {
///         Ok(())
///     }
/// }
///
/// impl LifetimeGuardian for LeaseGuardian {
///     type Guarded = Lease;
///
///     fn construction() -> Construction<Self> {
///         Construction::standalone(LeaseGuardian)
///     }
/// }
/// ```
pub trait LifetimeGuardian: Releasable + Sized + 'static {
    /// The exact resource type this guardian releases
    type Guarded: Any + Send + Sync;

    /// How instances are built around a registered resource
    fn construction() -> Construction<Self>;
}

/// Construction forms a guardian supports, chosen when it is declared
pub enum Construction<G: LifetimeGuardian> {
    /// Built from the resource alone; registering with a parent fails
    Standalone(fn(Arc<G::Guarded>) -> G),
    /// Built from the resource and its parent; registering without one fails
    WithParent(ParentForm<G>),
    /// Accepts registration both with and without a parent
    Either {
        standalone: fn(Arc<G::Guarded>) -> G,
        with_parent: ParentForm<G>,
    },
}

impl<G: LifetimeGuardian> Construction<G> {
    pub fn standalone(make: fn(Arc<G::Guarded>) -> G) -> Self {
        Construction::Standalone(make)
    }

    pub fn with_parent<P>(make: fn(Arc<G::Guarded>, Arc<P>) -> G) -> Self
    where
        P: Any + Send + Sync,
    {
        Construction::WithParent(ParentForm::new(make))
    }

    pub fn either<P>(
        standalone: fn(Arc<G::Guarded>) -> G,
        with_parent: fn(Arc<G::Guarded>, Arc<P>) -> G,
    ) -> Self
    where
        P: Any + Send + Sync,
    {
        Construction::Either {
            standalone,
            with_parent: ParentForm::new(with_parent),
        }
    }
}

/// Two-argument construction form with its expected parent type
pub struct ParentForm<G: LifetimeGuardian> {
    parent_type: TypeId,
    parent_name: &'static str,
    make: Box<dyn Fn(Arc<G::Guarded>, Erased) -> Option<G> + Send + Sync>,
}

impl<G: LifetimeGuardian> ParentForm<G> {
    pub fn new<P>(make: fn(Arc<G::Guarded>, Arc<P>) -> G) -> Self
    where
        P: Any + Send + Sync,
    {
        Self {
            parent_type: TypeId::of::<P>(),
            parent_name: type_name::<P>(),
            make: Box::new(move |resource, parent| {
                parent.downcast::<P>().ok().map(|parent| make(resource, parent))
            }),
        }
    }

    fn into_slot(self) -> ParentSlot {
        let make = self.make;
        ParentSlot {
            parent_type: self.parent_type,
            parent_name: self.parent_name,
            factory: Box::new(move |resource, parent| {
                let resource = resource.downcast::<G::Guarded>().ok()?;
                make(resource, parent).map(|guardian| Box::new(guardian) as Box<dyn Releasable>)
            }),
        }
    }
}

/// Parent handed to a guardian's two-argument form
#[derive(Clone)]
pub struct Parent {
    value: Erased,
    type_id: TypeId,
    type_name: &'static str,
}

impl Parent {
    pub fn new<P: Any + Send + Sync>(value: Arc<P>) -> Self {
        Self {
            value,
            type_id: TypeId::of::<P>(),
            type_name: type_name::<P>(),
        }
    }

    /// Name of the parent's concrete type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Identity of the parent's concrete type
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }
}

impl fmt::Debug for Parent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parent")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

struct ParentSlot {
    parent_type: TypeId,
    parent_name: &'static str,
    factory: ParentFactory,
}

enum Form {
    Standalone(StandaloneFactory),
    WithParent(ParentSlot),
    Either(StandaloneFactory, ParentSlot),
}

/// Type-erased record of one guardian and the resource type it guards
pub struct GuardianBinding {
    resource_type: TypeId,
    resource_name: &'static str,
    guardian_name: &'static str,
    form: Form,
}

impl GuardianBinding {
    /// Erase the declaration of guardian `G`
    pub fn of<G: LifetimeGuardian>() -> Self {
        let form = match G::construction() {
            Construction::Standalone(make) => Form::Standalone(standalone_factory::<G>(make)),
            Construction::WithParent(form) => Form::WithParent(form.into_slot()),
            Construction::Either {
                standalone,
                with_parent,
            } => Form::Either(standalone_factory::<G>(standalone), with_parent.into_slot()),
        };

        Self {
            resource_type: TypeId::of::<G::Guarded>(),
            resource_name: type_name::<G::Guarded>(),
            guardian_name: type_name::<G>(),
            form,
        }
    }

    pub fn resource_type(&self) -> TypeId {
        self.resource_type
    }

    pub fn resource_name(&self) -> &'static str {
        self.resource_name
    }

    pub fn guardian_name(&self) -> &'static str {
        self.guardian_name
    }

    /// Whether registration without a parent is supported
    pub fn accepts_standalone(&self) -> bool {
        matches!(self.form, Form::Standalone(_) | Form::Either(..))
    }

    /// Parent type expected by the two-argument form, if there is one
    pub fn parent_name(&self) -> Option<&'static str> {
        match &self.form {
            Form::WithParent(slot) | Form::Either(_, slot) => Some(slot.parent_name),
            Form::Standalone(_) => None,
        }
    }

    /// Build a guardian around `resource`, using the form matching `parent`.
    ///
    /// `resource` must be of the bound resource type.
    pub fn construct(
        &self,
        resource: Erased,
        parent: Option<&Parent>,
    ) -> Result<Box<dyn Releasable>> {
        let built = match (parent, &self.form) {
            (Some(parent), Form::WithParent(slot) | Form::Either(_, slot)) => {
                if parent.type_id != slot.parent_type {
                    return Err(Error::invalid_lifetime_object(format!(
                        "lifetime guardian {} for type {} expects a parent of type {}, got {}",
                        self.guardian_name, self.resource_name, slot.parent_name, parent.type_name
                    )));
                }
                (slot.factory)(resource, Arc::clone(&parent.value))
            }
            (Some(_), Form::Standalone(_)) => {
                return Err(Error::invalid_lifetime_object(format!(
                    "lifetime guardian {} for type {} does not support a parent",
                    self.guardian_name, self.resource_name
                )));
            }
            (None, Form::Standalone(factory) | Form::Either(factory, _)) => factory(resource),
            (None, Form::WithParent(slot)) => {
                return Err(Error::invalid_lifetime_object(format!(
                    "lifetime guardian {} for type {} requires a parent of type {}",
                    self.guardian_name, self.resource_name, slot.parent_name
                )));
            }
        };

        built.ok_or_else(|| {
            Error::invalid_lifetime_object(format!(
                "lifetime guardian {} received a resource that is not a {}",
                self.guardian_name, self.resource_name
            ))
        })
    }
}

impl fmt::Debug for GuardianBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardianBinding")
            .field("resource", &self.resource_name)
            .field("guardian", &self.guardian_name)
            .field("standalone", &self.accepts_standalone())
            .field("parent", &self.parent_name())
            .finish()
    }
}

fn standalone_factory<G: LifetimeGuardian>(make: fn(Arc<G::Guarded>) -> G) -> StandaloneFactory {
    Box::new(move |resource| {
        let resource = resource.downcast::<G::Guarded>().ok()?;
        Some(Box::new(make(resource)) as Box<dyn Releasable>)
    })
}
