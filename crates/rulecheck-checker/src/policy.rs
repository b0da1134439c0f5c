//! Failure policies for rule loading.
//!
//! A policy is a set of conditions. Each condition is a predicate over a
//! [`LoadError`]; an error is fatal when at least one configured condition
//! holds for it. The empty policy tolerates everything.

use crate::error::{CheckError, Result};
use rulecheck_core::LoadError;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A named category of load failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FailureCondition {
    /// Every failure.
    All,
    /// Anything that is not an import failure, read failures included.
    Dsl,
    /// A rule file references a package that cannot be loaded.
    Import,
}

impl FailureCondition {
    /// Every condition, in token order.
    pub const VALUES: [FailureCondition; 3] = [Self::All, Self::Dsl, Self::Import];

    /// Token used in configuration.
    pub fn token(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Dsl => "dsl",
            Self::Import => "import",
        }
    }

    /// Returns true if `err` falls into this category.
    pub fn matches(self, err: &LoadError) -> bool {
        match self {
            Self::All => true,
            Self::Dsl => !err.is_import(),
            Self::Import => err.is_import(),
        }
    }

    /// All valid tokens, comma-separated.
    pub fn supported_tokens() -> String {
        Self::VALUES
            .iter()
            .map(|c| c.token())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for FailureCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for FailureCondition {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self> {
        Self::VALUES
            .into_iter()
            .find(|c| c.token() == s)
            .ok_or_else(|| CheckError::InvalidFailurePolicy {
                token: s.to_string(),
                supported: Self::supported_tokens(),
            })
    }
}

/// Decides which load failures abort checker construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FailurePolicy {
    conditions: BTreeSet<FailureCondition>,
}

impl FailurePolicy {
    /// A policy under which nothing is fatal.
    pub fn lenient() -> Self {
        Self::default()
    }

    /// Parses a comma-separated token list such as `"import, dsl"`.
    ///
    /// Tokens are trimmed and empty entries skipped, so `""` is the lenient
    /// policy.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::InvalidFailurePolicy`] for the first unknown token.
    pub fn parse(flag: &str) -> Result<Self> {
        let mut conditions = BTreeSet::new();
        for token in flag.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            conditions.insert(token.parse()?);
        }
        Ok(Self { conditions })
    }

    pub fn from_conditions(conditions: impl IntoIterator<Item = FailureCondition>) -> Self {
        Self {
            conditions: conditions.into_iter().collect(),
        }
    }

    pub fn conditions(&self) -> impl Iterator<Item = FailureCondition> + '_ {
        self.conditions.iter().copied()
    }

    pub fn is_lenient(&self) -> bool {
        self.conditions.is_empty()
    }

    /// The configured conditions that hold for `err`.
    pub fn fatal_conditions(&self, err: &LoadError) -> Vec<FailureCondition> {
        self.conditions().filter(|c| c.matches(err)).collect()
    }

    /// Returns true when any configured condition holds for `err`.
    pub fn is_fatal(&self, err: &LoadError) -> bool {
        self.conditions().any(|c| c.matches(err))
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens: Vec<_> = self.conditions().map(FailureCondition::token).collect();
        f.write_str(&tokens.join(","))
    }
}

impl FromStr for FailurePolicy {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
