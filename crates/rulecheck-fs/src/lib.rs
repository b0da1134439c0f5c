//! Filesystem abstraction for rulecheck.
//!
//! This crate provides a `FileSystem` trait with two implementations: one
//! backed by the real filesystem (using `std::fs` and the `glob` crate) and
//! one backed by in-memory storage for tests and embedding hosts.
//!
//! All operations are blocking. Rule sets are small and are read once,
//! sequentially, while a checker is being constructed.
//!
//! # Example
//!
//! ```no_run
//! use rulecheck_fs::{FileSystem, NativeFileSystem};
//!
//! let fs = NativeFileSystem::new(".")?;
//! for path in fs.glob("rules/*.toml").expect("valid pattern") {
//!     println!("{}", fs.read_to_string(&path)?);
//! }
//! # Ok::<(), std::io::Error>(())
//! ```

mod file_system;
pub use file_system::{FileMetadata, FileSystem, GlobError};

#[cfg(feature = "native")]
pub mod native;
#[cfg(feature = "native")]
pub use native::NativeFileSystem;

#[cfg(feature = "memory")]
pub mod memory;
#[cfg(feature = "memory")]
pub use memory::MemoryFileSystem;

#[cfg(feature = "native")]
pub use NativeFileSystem as DefaultFileSystem;

#[cfg(all(not(feature = "native"), feature = "memory"))]
pub use MemoryFileSystem as DefaultFileSystem;
