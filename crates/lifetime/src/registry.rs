//! Process-wide lookup table from resource types to their lifetime guardians
//!
//! Guardians are declared in [`GuardianCatalog`]s, one or more per crate, and
//! submitted to a [`WrapperRegistry`]. The registry stays unpopulated until
//! the first lookup, which scans every submitted catalog at once. Catalogs
//! submitted afterwards stay pending until a lookup misses for a type defined
//! in the same crate, which scans that crate's catalogs on demand. Each
//! source is scanned at most once and bindings are never overwritten.
//!
//! Population is serialised by a mutex; steady-state lookups only take a
//! shared read lock.

use crate::binding::{GuardianBinding, LifetimeGuardian};
use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};
use std::any::{type_name, TypeId};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Global guardian registry shared by every lifetime context of the process
static GLOBAL_REGISTRY: Lazy<Arc<WrapperRegistry>> = Lazy::new(|| Arc::new(WrapperRegistry::new()));

/// Source a type belongs to: the crate named by the first path segment.
///
/// Types are located through [`std::any::type_name`], whose output is not
/// guaranteed to be stable across compiler versions. A name that does not
/// start with the defining crate only disables on-demand scanning for that
/// type; catalogs scanned in bulk still resolve it by `TypeId`.
pub fn source_of(path: &str) -> &str {
    let end = path.find("::").unwrap_or(path.len());
    let end = path[..end].find('<').unwrap_or(end);
    &path[..end]
}

/// Guardian declarations of one source
///
/// Usually built with [`guardian_catalog!`](crate::guardian_catalog), which
/// takes the source from `module_path!()`.
#[derive(Debug)]
pub struct GuardianCatalog {
    source: &'static str,
    bindings: Vec<GuardianBinding>,
}

impl GuardianCatalog {
    /// Empty catalog for `source`; module paths are reduced to their crate
    pub fn new(source: &'static str) -> Self {
        Self {
            source: source_of(source),
            bindings: Vec::new(),
        }
    }

    /// Declare guardian `G`
    #[must_use]
    pub fn guardian<G: LifetimeGuardian>(self) -> Self {
        self.bind(GuardianBinding::of::<G>())
    }

    /// Add an already erased binding
    #[must_use]
    pub fn bind(mut self, binding: GuardianBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    pub fn source(&self) -> &'static str {
        self.source
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Build a [`GuardianCatalog`] for the calling crate
///
/// ```
/// # use lifeguard_lifetime::{guardian_catalog, Construction, LifetimeGuardian, Releasable};
/// # use std::sync::Arc;
/// # struct Lease;
/// # struct LeaseGuardian(Arc<Lease>);
/// # impl Releasable for LeaseGuardian {
/// #     fn release(&self) -> Result<(), lifeguard_core::BoxError> { Ok(()) }
/// # }
/// # impl LifetimeGuardian for LeaseGuardian {
/// #     type Guarded = Lease;
/// #     fn construction() -> Construction<Self> { Construction::standalone(LeaseGuardian) }
/// # }
/// let catalog = guardian_catalog![LeaseGuardian];
/// assert_eq!(catalog.len(), 1);
/// ```
#[macro_export]
macro_rules! guardian_catalog {
    ($($guardian:ty),* $(,)?) => {
        $crate::GuardianCatalog::new(::core::module_path!())
            $(.guardian::<$guardian>())*
    };
}

#[derive(Default)]
struct GuardianTable {
    populated: bool,
    bindings: HashMap<TypeId, Arc<GuardianBinding>>,
    scanned: HashSet<&'static str>,
    /// Types known to have no binding, with the source they were looked up in
    misses: HashMap<TypeId, String>,
}

/// Registry resolving resource types to guardian bindings
pub struct WrapperRegistry {
    table: RwLock<GuardianTable>,
    /// Catalogs not scanned yet; the lock also serialises population
    pending: Mutex<Vec<GuardianCatalog>>,
}

impl Default for WrapperRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl WrapperRegistry {
    /// Create an isolated, empty registry
    pub fn new() -> Self {
        Self {
            table: RwLock::new(GuardianTable::default()),
            pending: Mutex::new(Vec::new()),
        }
    }

    /// The process-wide registry
    pub fn global() -> Arc<WrapperRegistry> {
        Arc::clone(&GLOBAL_REGISTRY)
    }

    /// Queue a catalog for scanning.
    ///
    /// Returns `false` when the catalog's source was already scanned; such a
    /// catalog is dropped so existing bindings stay untouched.
    pub fn submit(&self, catalog: GuardianCatalog) -> bool {
        let mut pending = self.pending.lock();
        if self.table.read().scanned.contains(catalog.source()) {
            tracing::warn!(
                source = catalog.source(),
                guardians = catalog.len(),
                "guardian catalog refused, source already scanned"
            );
            return false;
        }

        tracing::debug!(
            source = catalog.source(),
            guardians = catalog.len(),
            "guardian catalog submitted"
        );
        self.table
            .write()
            .misses
            .retain(|_, source| source.as_str() != catalog.source());
        pending.push(catalog);
        true
    }

    /// Guardian bound to `T`, if any
    pub fn resolve_for<T: 'static>(&self) -> Option<Arc<GuardianBinding>> {
        self.resolve(TypeId::of::<T>(), type_name::<T>())
    }

    /// Guardian bound to the type identified by `type_id`.
    ///
    /// `type_name` locates the type's source for on-demand scanning.
    pub fn resolve(&self, type_id: TypeId, type_name: &str) -> Option<Arc<GuardianBinding>> {
        let source = source_of(type_name);

        {
            let table = self.table.read();
            if table.populated {
                if let Some(binding) = table.bindings.get(&type_id) {
                    return Some(Arc::clone(binding));
                }
                if table.scanned.contains(source) || table.misses.contains_key(&type_id) {
                    return None;
                }
            }
        }

        let mut pending = self.pending.lock();
        let mut table = self.table.write();

        if !table.populated {
            let catalogs: Vec<_> = pending.drain(..).collect();
            tracing::debug!(catalogs = catalogs.len(), "populating guardian registry");
            for catalog in catalogs {
                scan(&mut table, catalog);
            }
            table.populated = true;
        }

        if let Some(binding) = table.bindings.get(&type_id) {
            return Some(Arc::clone(binding));
        }

        if table.scanned.contains(source) {
            return None;
        }

        let (matching, remaining): (Vec<_>, Vec<_>) = pending
            .drain(..)
            .partition(|catalog| catalog.source() == source);
        *pending = remaining;

        if matching.is_empty() {
            table.misses.insert(type_id, source.to_string());
            return None;
        }

        tracing::debug!(source, catalogs = matching.len(), "scanning guardian source on demand");
        for catalog in matching {
            scan(&mut table, catalog);
        }

        table.bindings.get(&type_id).map(Arc::clone)
    }

    /// Populate from every pending catalog now instead of on first lookup
    pub fn populate(&self) {
        let mut pending = self.pending.lock();
        let mut table = self.table.write();
        for catalog in pending.drain(..) {
            scan(&mut table, catalog);
        }
        table.populated = true;
    }

    /// Whether the bulk scan has happened
    pub fn is_populated(&self) -> bool {
        self.table.read().populated
    }

    /// Whether a binding for `T` is already known, without scanning
    pub fn contains<T: 'static>(&self) -> bool {
        self.table.read().bindings.contains_key(&TypeId::of::<T>())
    }

    /// Number of known bindings
    pub fn len(&self) -> usize {
        self.table.read().bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of catalogs waiting to be scanned
    pub fn pending_catalogs(&self) -> usize {
        self.pending.lock().len()
    }
}

impl std::fmt::Debug for WrapperRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = self.table.read();
        f.debug_struct("WrapperRegistry")
            .field("populated", &table.populated)
            .field("bindings", &table.bindings.len())
            .field("scanned", &table.scanned)
            .finish()
    }
}

fn scan(table: &mut GuardianTable, catalog: GuardianCatalog) {
    let source = catalog.source;
    for binding in catalog.bindings {
        match table.bindings.entry(binding.resource_type()) {
            Entry::Occupied(existing) => {
                tracing::warn!(
                    resource = binding.resource_name(),
                    kept = existing.get().guardian_name(),
                    ignored = binding.guardian_name(),
                    "duplicate lifetime guardian ignored"
                );
            }
            Entry::Vacant(slot) => {
                tracing::trace!(
                    resource = binding.resource_name(),
                    guardian = binding.guardian_name(),
                    "lifetime guardian bound"
                );
                slot.insert(Arc::new(binding));
            }
        }
    }
    table.scanned.insert(source);
}
