//! Native filesystem implementation using std::fs + glob.

use crate::{FileMetadata, FileSystem, GlobError};
use glob::{MatchOptions, Pattern};
use std::io;
use std::path::{Path, PathBuf};

/// Native filesystem implementation.
#[derive(Debug, Clone)]
pub struct NativeFileSystem {
    root: PathBuf,
}

impl NativeFileSystem {
    /// Create a native filesystem resolving relative paths against `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the root doesn't exist or can't be canonicalized.
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref().canonicalize().map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("Root does not exist: {}", root.as_ref().display()),
            )
        })?;

        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Root is not a directory: {}", root.display()),
            ));
        }

        Ok(Self { root })
    }

    /// Create a native filesystem rooted at the current working directory.
    pub fn current_dir() -> io::Result<Self> {
        Self::new(std::env::current_dir()?)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn match_options() -> MatchOptions {
        MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        }
    }
}

impl FileSystem for NativeFileSystem {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        Ok(self.resolve(path).exists())
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(self.resolve(path))
    }

    fn metadata(&self, path: &Path) -> io::Result<FileMetadata> {
        match std::fs::metadata(self.resolve(path)) {
            Ok(meta) => Ok(FileMetadata {
                exists: true,
                is_file: meta.is_file(),
                is_dir: meta.is_dir(),
                size: meta.len(),
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(FileMetadata::missing()),
            Err(e) => Err(e),
        }
    }

    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>, GlobError> {
        let relative = !Path::new(pattern).is_absolute();

        // Validate the pattern on its own so errors point at what the user wrote
        Pattern::new(pattern).map_err(|e| GlobError {
            pattern: pattern.to_string(),
            message: e.msg.to_string(),
        })?;

        let full = if relative {
            let root = Pattern::escape(&self.root.to_string_lossy());
            format!("{}{}{}", root, std::path::MAIN_SEPARATOR, pattern)
        } else {
            pattern.to_string()
        };

        let entries = glob::glob_with(&full, Self::match_options()).map_err(|e| GlobError {
            pattern: pattern.to_string(),
            message: e.msg.to_string(),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) if relative => match path.strip_prefix(&self.root) {
                    Ok(stripped) => paths.push(stripped.to_path_buf()),
                    Err(_) => paths.push(path),
                },
                Ok(path) => paths.push(path),
                Err(e) => {
                    // Unreadable directories are not part of the match set
                    tracing::debug!(pattern, error = %e, "skipping unreadable glob entry");
                }
            }
        }
        paths.sort();

        Ok(paths)
    }

    fn root(&self) -> &Path {
        &self.root
    }
}
