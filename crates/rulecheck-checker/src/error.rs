//! Error types for checker construction.

use rulecheck_core::LoadError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for checker construction.
pub type Result<T> = std::result::Result<T, CheckError>;

/// Errors that abort checker construction.
///
/// Run-time failures never show up here; they become warnings on the unit.
#[derive(Debug, Error)]
pub enum CheckError {
    /// A rule pattern matched no file. Fatal under every failure policy.
    #[error("no file matching '{pattern}'")]
    NoMatchingFiles {
        /// The trimmed pattern.
        pattern: String,
    },

    /// A rule file failed to read or load and the failure policy made it fatal.
    #[error("failed to load rules: {source}")]
    RuleLoad {
        /// Rule file that failed.
        file: PathBuf,
        /// Classified load failure.
        #[source]
        source: LoadError,
    },

    /// The failure policy contains an unknown token.
    #[error(
        "'fail_on_error' value '{token}' is invalid. It must be a comma-separated list and supported values are '{supported}'"
    )]
    InvalidFailurePolicy {
        /// The offending token.
        token: String,
        /// Every valid token, comma-separated.
        supported: String,
    },

    /// The finding order is not one of the known orders.
    #[error("'order' value '{value}' is invalid. Supported values are '{supported}'")]
    InvalidOrder {
        /// The offending value.
        value: String,
        /// Every valid value, comma-separated.
        supported: String,
    },
}

impl CheckError {
    /// The rule file involved, if any.
    pub fn file(&self) -> Option<&std::path::Path> {
        match self {
            Self::RuleLoad { file, .. } => Some(file),
            _ => None,
        }
    }
}
