//! Built-in guardians for file resources

use crate::file_ref::FileRef;
use lifeguard_core::BoxError;
use lifeguard_lifetime::{
    guardian_catalog, Construction, GuardianCatalog, LifetimeGuardian, Releasable,
    WrapperRegistry,
};
use once_cell::sync::Lazy;
use std::sync::Arc;

static INSTALLED: Lazy<bool> = Lazy::new(|| WrapperRegistry::global().submit(catalog()));

/// Deletes a [`FileRef`]'s file at teardown
pub struct FileRefGuardian {
    file: Arc<FileRef>,
}

impl Releasable for FileRefGuardian {
    fn release(&self) -> Result<(), BoxError> {
        self.file.delete().map_err(BoxError::from)
    }
}

impl LifetimeGuardian for FileRefGuardian {
    type Guarded = FileRef;

    fn construction() -> Construction<Self> {
        Construction::standalone(|file| FileRefGuardian { file })
    }
}

/// Guardians published by this crate
pub fn catalog() -> GuardianCatalog {
    guardian_catalog![FileRefGuardian]
}

/// Submit [`catalog`] to the global registry.
///
/// Only the first call submits; later calls return the first outcome.
pub fn install_guardians() -> bool {
    *INSTALLED
}
