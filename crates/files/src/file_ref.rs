//! References to files that may not exist yet

use lifeguard_core::{Error, Result};
use lifeguard_lifetime::LifetimeObject;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Characters rejected anywhere in a path, on every platform, next to the
/// control characters below 0x20
const INVALID_PATH_CHARS: &[char] = &['"', '<', '>', '|'];

/// Characters additionally rejected in a file name
const INVALID_NAME_CHARS: &[char] = &[':', '*', '?', '\\', '/'];

fn is_invalid_path_char(c: char) -> bool {
    u32::from(c) < 0x20 || INVALID_PATH_CHARS.contains(&c)
}

fn is_invalid_name_char(c: char) -> bool {
    is_invalid_path_char(c) || INVALID_NAME_CHARS.contains(&c)
}

/// A file identified by its full path.
///
/// Validation only looks at the path; the file itself is created and removed
/// through [`open_writer`](FileRef::open_writer) and
/// [`delete`](FileRef::delete). Registered with a lifetime context, a
/// `FileRef` is deleted by the `FileRefGuardian` at teardown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    full_path: PathBuf,
    name: String,
}

impl FileRef {
    fn new(full_path: PathBuf) -> Self {
        let name = full_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { full_path, name }
    }

    /// Reference a file by relative or rooted path.
    ///
    /// Relative paths resolve against the current directory.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        require_non_blank(path)?;
        require_valid_chars(path)?;

        if path.has_root() {
            Ok(Self::new(path.to_path_buf()))
        } else {
            Ok(Self::new(resolve_relative(path)?))
        }
    }

    /// Reference a file by rooted path.
    ///
    /// Characters are not validated; see [`file_path_is_valid`](Self::file_path_is_valid).
    pub fn create_absolute(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        require_non_blank(path)?;

        if !path.has_root() {
            return Err(Error::invalid_path(
                path.display().to_string(),
                "received a relative path where an absolute one was expected",
            ));
        }

        Ok(Self::new(path.to_path_buf()))
    }

    /// Reference a file by path relative to the current directory
    pub fn create_virtual(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        require_non_blank(path)?;

        if path.has_root() || looks_rooted(path) {
            return Err(Error::invalid_path(
                path.display().to_string(),
                "received an absolute path where a relative one was expected",
            ));
        }
        require_valid_chars(path)?;

        Ok(Self::new(resolve_relative(path)?))
    }

    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    /// File name including the extension
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File name without extension and dot
    pub fn simple_name(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(&self.name)
    }

    /// Extension with its leading dot, or an empty string
    pub fn extension(&self) -> String {
        Path::new(&self.name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default()
    }

    pub fn exists(&self) -> bool {
        self.full_path.is_file()
    }

    /// Whether the full path is free of invalid path characters
    pub fn file_path_is_valid(&self) -> bool {
        !self
            .full_path
            .to_string_lossy()
            .chars()
            .any(is_invalid_path_char)
    }

    /// Whether the file name is free of invalid name characters
    pub fn file_name_is_valid(&self) -> bool {
        !self.name.chars().any(is_invalid_name_char)
    }

    /// Open for writing, creating the file if needed without truncating it
    pub fn open_writer(&self) -> Result<File> {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.full_path)
            .map_err(|e| Error::file_system(&self.full_path, "open for writing", e))
    }

    pub fn open_reader(&self) -> Result<File> {
        File::open(&self.full_path).map_err(|e| Error::file_system(&self.full_path, "open", e))
    }

    /// Remove the file; a missing file is not an error
    pub fn delete(&self) -> Result<()> {
        match fs::remove_file(&self.full_path) {
            Ok(()) => {
                tracing::trace!(path = %self.full_path.display(), "file deleted");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::file_system(&self.full_path, "delete", e)),
        }
    }
}

impl LifetimeObject for FileRef {}

impl AsRef<Path> for FileRef {
    fn as_ref(&self) -> &Path {
        &self.full_path
    }
}

fn require_non_blank(path: &Path) -> Result<()> {
    if path.as_os_str().to_string_lossy().trim().is_empty() {
        return Err(Error::invalid_path("", "path must not be blank"));
    }
    Ok(())
}

fn require_valid_chars(path: &Path) -> Result<()> {
    let text = path.to_string_lossy();
    match text.chars().find(|&c| is_invalid_path_char(c)) {
        Some(c) => Err(Error::invalid_path(
            text.into_owned(),
            format!("contains invalid character {c:?}"),
        )),
        None => Ok(()),
    }
}

/// Drive-letter and backslash-rooted paths count as rooted on every platform
fn looks_rooted(path: &Path) -> bool {
    let text = path.to_string_lossy();
    let bytes = text.as_bytes();
    text.starts_with('\\')
        || (bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':')
}

fn resolve_relative(path: &Path) -> Result<PathBuf> {
    std::env::current_dir()
        .map(|dir| dir.join(path))
        .map_err(|e| Error::file_system(path, "resolve current directory", e))
}
