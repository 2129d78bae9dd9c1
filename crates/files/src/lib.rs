//! File resources for lifetime-tracked tests
//!
//! [`FileRef`] names a file, [`TemporaryFile`] deletes it when released or
//! dropped, and the helpers in [`io_helpers`] create files of random content
//! and compare them. Call [`install_guardians`] once before registering a
//! bare [`FileRef`] with a context from the global registry.

pub mod file_ref;
pub mod guardians;
pub mod io_helpers;
pub mod temporary_file;

pub use file_ref::FileRef;
pub use guardians::{catalog, install_guardians, FileRefGuardian};
pub use io_helpers::{
    compare_files, create_file, create_managed_temporary_file, create_temporary_file,
    overwrite_file,
};
pub use temporary_file::TemporaryFile;
