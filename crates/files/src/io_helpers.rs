//! Creating and comparing files filled with random data

use crate::file_ref::FileRef;
use crate::temporary_file::TemporaryFile;
use lifeguard_core::{Error, Result};
use lifeguard_utils::{random_bytes, random_file_name};
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, Read, Write};
use std::path::Path;

/// Bytes compared per read in [`compare_files`]
const COMPARE_CHUNK: usize = 8 * 1024;

/// Create a file of `size` random bytes deleted when the result is dropped.
///
/// Without `folder` the file is placed in the system temporary directory.
pub fn create_temporary_file(size: usize, folder: Option<&Path>) -> Result<TemporaryFile> {
    create_managed_temporary_file(size, folder).map(TemporaryFile::from_managed_file)
}

/// Create a file of `size` random bytes under a random name.
///
/// The caller owns the file; nothing deletes it automatically.
pub fn create_managed_temporary_file(size: usize, folder: Option<&Path>) -> Result<FileRef> {
    let (mut file, path) = match folder {
        Some(folder) => {
            let path = folder.join(random_file_name());
            let file = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .map_err(|e| Error::file_system(&path, "create", e))?;
            (file, path)
        }
        None => tempfile::Builder::new()
            .prefix("lifeguard")
            .tempfile()
            .and_then(|temp| temp.keep().map_err(|e| e.error))
            .map_err(|e| Error::file_system(std::env::temp_dir(), "create temporary file", e))?,
    };

    write_random_data(&mut file, &path, size)?;
    tracing::debug!(path = %path.display(), size, "temporary file created");
    FileRef::create(path)
}

/// Create `path` with `size` random bytes, creating missing parent directories
pub fn create_file(path: impl AsRef<Path>, size: usize) -> Result<FileRef> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::file_system(parent, "create directory", e))?;
    }

    let mut file = File::create(path).map_err(|e| Error::file_system(path, "create", e))?;
    write_random_data(&mut file, path, size)?;
    FileRef::create(path)
}

/// Replace the content of `path` with `size` random bytes
pub fn overwrite_file(size: usize, path: impl AsRef<Path>) -> Result<FileRef> {
    let file_ref = FileRef::create(path)?;
    let mut file = file_ref.open_writer()?;

    write_random_data(&mut file, file_ref.full_path(), size)?;
    file.set_len(size as u64)
        .map_err(|e| Error::file_system(file_ref.full_path(), "truncate", e))?;

    Ok(file_ref)
}

/// Whether two files have identical content.
///
/// Paths naming the same file compare equal without reading it.
pub fn compare_files(first: impl AsRef<Path>, second: impl AsRef<Path>) -> Result<bool> {
    let (first, second) = (first.as_ref(), second.as_ref());
    if first == second {
        return Ok(true);
    }

    let canonical = |path: &Path| {
        fs::canonicalize(path).map_err(|e| Error::file_system(path, "resolve", e))
    };
    if canonical(first)? == canonical(second)? {
        return Ok(true);
    }

    let length = |path: &Path| {
        fs::metadata(path)
            .map(|metadata| metadata.len())
            .map_err(|e| Error::file_system(path, "stat", e))
    };
    let size = length(first)?;
    if size != length(second)? {
        return Ok(false);
    }

    let open = |path: &Path| {
        File::open(path)
            .map(BufReader::new)
            .map_err(|e| Error::file_system(path, "open", e))
    };
    let (mut one, mut two) = (open(first)?, open(second)?);
    let (mut left, mut right) = (vec![0u8; COMPARE_CHUNK], vec![0u8; COMPARE_CHUNK]);

    let mut remaining = size;
    while remaining > 0 {
        let chunk = remaining.min(COMPARE_CHUNK as u64) as usize;
        one.read_exact(&mut left[..chunk])
            .map_err(|e| Error::file_system(first, "read", e))?;
        two.read_exact(&mut right[..chunk])
            .map_err(|e| Error::file_system(second, "read", e))?;
        if left[..chunk] != right[..chunk] {
            return Ok(false);
        }
        remaining -= chunk as u64;
    }

    Ok(true)
}

fn write_random_data(file: &mut File, path: &Path, size: usize) -> Result<()> {
    if size == 0 {
        return Ok(());
    }
    file.write_all(&random_bytes(size))
        .and_then(|()| file.flush())
        .map_err(|e| Error::file_system(path, "write", e))
}
