//! Files removed when released or dropped

use crate::file_ref::FileRef;
use lifeguard_core::{BoxError, Result};
use lifeguard_lifetime::{LifetimeObject, Releasable};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// RAII guard deleting its file on release or drop.
///
/// Deletion happens at most once. After [`keep`](TemporaryFile::keep) the
/// file survives both.
#[derive(Debug)]
pub struct TemporaryFile {
    file: FileRef,
    deleted: AtomicBool,
    kept: AtomicBool,
}

impl TemporaryFile {
    /// Temporary file at `path`, resolved like [`FileRef::create`]
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        FileRef::create(path).map(Self::from_managed_file)
    }

    /// Take over deletion of an existing reference
    pub fn from_managed_file(file: FileRef) -> Self {
        Self {
            file,
            deleted: AtomicBool::new(false),
            kept: AtomicBool::new(false),
        }
    }

    pub fn file(&self) -> &FileRef {
        &self.file
    }

    pub fn path(&self) -> &Path {
        self.file.full_path()
    }

    /// Keep the file after release and drop
    pub fn keep(&self) -> PathBuf {
        self.kept.store(true, Ordering::SeqCst);
        self.file.full_path().to_path_buf()
    }

    pub fn is_kept(&self) -> bool {
        self.kept.load(Ordering::SeqCst)
    }

    fn delete_once(&self) -> Result<()> {
        if self.is_kept() || self.deleted.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.file.delete()
    }
}

impl Deref for TemporaryFile {
    type Target = FileRef;

    fn deref(&self) -> &FileRef {
        &self.file
    }
}

impl Releasable for TemporaryFile {
    fn release(&self) -> std::result::Result<(), BoxError> {
        self.delete_once().map_err(BoxError::from)
    }
}

impl LifetimeObject for TemporaryFile {
    fn as_releasable(self: Arc<Self>) -> Option<Arc<dyn Releasable>> {
        Some(self)
    }
}

impl Drop for TemporaryFile {
    fn drop(&mut self) {
        if let Err(e) = self.delete_once() {
            tracing::warn!(
                path = %self.file.full_path().display(),
                error = %e,
                "failed to remove temporary file"
            );
        }
    }
}
