//! FileSystem trait for blocking filesystem operations.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File metadata compatible across implementations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    /// Whether the path exists.
    pub exists: bool,
    /// Whether the path is a file (false if directory or doesn't exist).
    pub is_file: bool,
    /// Whether the path is a directory.
    pub is_dir: bool,
    /// File size in bytes (0 for directories or non-existent files).
    pub size: u64,
}

impl FileMetadata {
    /// Metadata for a path that does not exist.
    pub fn missing() -> Self {
        Self {
            exists: false,
            is_file: false,
            is_dir: false,
            size: 0,
        }
    }
}

/// A glob pattern that could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid glob pattern '{pattern}': {message}")]
pub struct GlobError {
    /// The pattern as supplied.
    pub pattern: String,
    /// Why it was rejected.
    pub message: String,
}

/// Blocking filesystem abstraction.
///
/// # Paths
///
/// Relative paths and patterns are resolved against [`FileSystem::root`].
/// Paths returned by [`FileSystem::glob`] keep the form of the pattern:
/// relative patterns yield root-relative paths, absolute patterns yield
/// absolute paths.
///
/// # Error Handling
///
/// Uses `std::io::Result<T>` for I/O:
/// - Native: Direct mapping from std::fs errors
/// - Memory: Construct io::Error with appropriate ErrorKind
pub trait FileSystem: Send + Sync {
    /// Check if a path exists.
    fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Read file contents as a string.
    ///
    /// # Errors
    ///
    /// Returns `io::ErrorKind::NotFound` if file doesn't exist.
    /// Returns `io::ErrorKind::InvalidData` if file is not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Get file/directory metadata.
    ///
    /// Returns metadata even if the file doesn't exist (exists=false).
    fn metadata(&self, path: &Path) -> io::Result<FileMetadata>;

    /// Expand a glob pattern.
    ///
    /// `*`, `?` and `[...]` never match a path separator. Matches are
    /// returned in lexicographic order; a pattern without wildcards matches
    /// itself if the path exists.
    ///
    /// # Errors
    ///
    /// Returns [`GlobError`] only when the pattern itself is malformed.
    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>, GlobError>;

    /// Directory relative paths are resolved against.
    fn root(&self) -> &Path;
}
