//! In-memory filesystem implementation.

use crate::{FileMetadata, FileSystem, GlobError};
use globset::GlobBuilder;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Filesystem backed by a map of paths to contents.
///
/// Used by tests and by hosts that hold rule files in memory. Keys are
/// stored normalized and absolute (joined to the root) so lookups are
/// insensitive to `./` and `..` spelling.
///
/// # Thread Safety
///
/// Uses `Arc<RwLock<BTreeMap>>` for interior mutability:
/// - Multiple concurrent readers (common case)
/// - Exclusive writer (rare: only during setup)
#[derive(Debug, Clone)]
pub struct MemoryFileSystem {
    root: PathBuf,
    files: Arc<RwLock<BTreeMap<PathBuf, Vec<u8>>>>,
}

impl MemoryFileSystem {
    /// Create an empty filesystem rooted at `root` (e.g. "/project").
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: normalize(Path::new("/"), root.as_ref()),
            files: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Add a file (builder form).
    pub fn with_file(self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> Self {
        self.add_file(path, contents);
        self
    }

    /// Add or replace a file.
    pub fn add_file(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        let key = normalize(&self.root, path.as_ref());
        self.files.write().insert(key, contents.into());
    }

    /// Remove a file, returning whether it existed.
    pub fn remove_file(&self, path: impl AsRef<Path>) -> bool {
        let key = normalize(&self.root, path.as_ref());
        self.files.write().remove(&key).is_some()
    }

    fn is_dir(&self, key: &Path) -> bool {
        self.files
            .read()
            .keys()
            .any(|path| path != key && path.starts_with(key))
    }
}

/// Syntactic normalization: joins relative paths to `root`, drops `.`,
/// resolves `..` without touching any real filesystem.
fn normalize(root: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };

    let mut result = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                result.push(component.as_os_str());
            }
            Component::CurDir => {
                // Skip "."
            }
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(name) => {
                result.push(name);
            }
        }
    }
    result
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        let key = normalize(&self.root, path);
        let is_file = self.files.read().contains_key(&key);
        Ok(is_file || self.is_dir(&key))
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let key = normalize(&self.root, path);
        let found = self.files.read().get(&key).cloned();
        let bytes = found.ok_or_else(|| {
            if self.is_dir(&key) {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("Is a directory: {}", path.display()),
                )
            } else {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("File not found: {}", path.display()),
                )
            }
        })?;

        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn metadata(&self, path: &Path) -> io::Result<FileMetadata> {
        let key = normalize(&self.root, path);
        let size = self.files.read().get(&key).map(|contents| contents.len() as u64);
        if let Some(size) = size {
            return Ok(FileMetadata {
                exists: true,
                is_file: true,
                is_dir: false,
                size,
            });
        }

        if self.is_dir(&key) {
            return Ok(FileMetadata {
                exists: true,
                is_file: false,
                is_dir: true,
                size: 0,
            });
        }

        Ok(FileMetadata::missing())
    }

    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>, GlobError> {
        let relative = !Path::new(pattern).is_absolute();
        let to_error = |e: globset::Error| GlobError {
            pattern: pattern.to_string(),
            message: e.kind().to_string(),
        };

        // Validate the pattern on its own so errors point at what the user wrote
        GlobBuilder::new(pattern).build().map_err(to_error)?;

        let full = if relative {
            let root = globset::escape(&self.root.to_string_lossy());
            format!("{}/{}", root.trim_end_matches('/'), pattern)
        } else {
            pattern.to_string()
        };

        let matcher = GlobBuilder::new(&full)
            .literal_separator(true)
            .build()
            .map_err(to_error)?
            .compile_matcher();

        // BTreeMap iteration is already lexicographic
        let paths = self
            .files
            .read()
            .keys()
            .filter(|path| matcher.is_match(path))
            .map(|path| {
                if relative {
                    path.strip_prefix(&self.root)
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|_| path.clone())
                } else {
                    path.clone()
                }
            })
            .collect();

        Ok(paths)
    }

    fn root(&self) -> &Path {
        &self.root
    }
}
