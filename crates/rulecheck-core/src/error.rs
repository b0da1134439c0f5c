//! Error types for rulecheck core.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for rulecheck core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the checker registry and unit loading.
#[derive(Debug, Error)]
pub enum Error {
    /// No checker with this name is registered.
    #[error("Checker not registered: {name}")]
    UnknownChecker {
        /// Name that was looked up.
        name: String,
    },

    /// A checker with the same name was already registered.
    #[error("Checker already registered: {name}")]
    DuplicateChecker {
        /// Name of the checker.
        name: String,
    },

    /// A parameter was supplied that the checker does not declare.
    #[error("Unknown parameter '{param}' for checker {checker}")]
    UnknownParam {
        /// Checker the parameter was passed to.
        checker: String,
        /// The undeclared parameter.
        param: String,
    },

    /// The checker's constructor refused its configuration.
    #[error("Failed to initialize checker {checker}: {source}")]
    CheckerInit {
        /// Name of the checker.
        checker: String,
        /// Error returned by the constructor.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// JSON parsing error (unit dumps).
    #[error("JSON parse error in {}: {source}", .file.display())]
    JsonError {
        /// Path of the JSON document.
        file: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A failure while loading one rule file into an engine.
///
/// The variants are what failure policies discriminate on: import failures
/// are one category, everything else counts as a rule language violation.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The rule file references a package that cannot be located or loaded.
    #[error("{}: import \"{package}\": package cannot be loaded", .file.display())]
    Import {
        /// Rule file containing the import.
        file: PathBuf,
        /// The package that failed to resolve.
        package: String,
    },

    /// The rule file does not comply with the rule language.
    #[error("{}{}: {message}", .file.display(), at_line(.line))]
    Dsl {
        /// Rule file with the violation.
        file: PathBuf,
        /// 1-based line, when known.
        line: Option<usize>,
        /// Description of the violation.
        message: String,
    },

    /// The rule file could not be read.
    #[error("failed to read {}: {source}", .file.display())]
    Read {
        /// Rule file that could not be read.
        file: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

fn at_line(line: &Option<usize>) -> String {
    line.map(|l| format!(":{l}")).unwrap_or_default()
}

impl LoadError {
    /// Builds a rule language violation.
    pub fn dsl(file: impl Into<PathBuf>, line: Option<usize>, message: impl Into<String>) -> Self {
        Self::Dsl {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    /// Returns true for import/dependency-resolution failures.
    pub fn is_import(&self) -> bool {
        matches!(self, Self::Import { .. })
    }

    /// The rule file this error belongs to.
    pub fn file(&self) -> &Path {
        match self {
            Self::Import { file, .. } | Self::Dsl { file, .. } | Self::Read { file, .. } => file,
        }
    }
}

/// An engine failure while matching one source unit.
///
/// Never fatal to a host run; it is surfaced as a single warning on the unit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RunError {
    /// Description of what went wrong during matching.
    pub message: String,
}

impl RunError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
