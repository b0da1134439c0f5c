//! Rule engine interface.
//!
//! A rule engine compiles rule files and matches them against source units.
//! Rulecheck treats it as an opaque collaborator: the checker only loads
//! files into it and asks it to run.

use crate::error::{LoadError, RunError};
use crate::types::{FileIndex, Finding, PackageInfo, Sizes, SourceUnit, TypeInfo};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

/// Context available while loading rule files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseContext {
    /// Packages the host front end is able to load for rule files.
    pub importable: BTreeSet<String>,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context that can resolve the given packages.
    pub fn with_importable<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            importable: packages.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if `package` can be imported by a rule file.
    pub fn can_import(&self, package: &str) -> bool {
        self.importable.contains(package)
    }
}

/// Everything an engine needs to evaluate rules against one unit.
///
/// Borrowed for a single run and never retained by the engine.
pub struct RunContext<'a> {
    /// Rule group to trace, if any.
    pub debug: Option<&'a str>,
    /// Receives one trace line at a time while `debug` is set.
    pub debug_print: &'a (dyn Fn(&str) + Sync),
    /// Package symbol table.
    pub package: &'a PackageInfo,
    /// Per-node type information.
    pub types: &'a TypeInfo,
    /// Platform size information.
    pub sizes: &'a Sizes,
    /// Position index of the unit's file.
    pub files: &'a FileIndex,
}

impl RunContext<'_> {
    /// Returns true when `group` is the group being traced.
    pub fn debug_enabled(&self, group: &str) -> bool {
        self.debug == Some(group)
    }

    /// Emits one trace line.
    pub fn trace(&self, line: &str) {
        (self.debug_print)(line);
    }
}

impl fmt::Debug for RunContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunContext")
            .field("debug", &self.debug)
            .field("package", &self.package.path)
            .field("types", &self.types.len())
            .field("sizes", self.sizes)
            .field("file", &self.files.path())
            .finish()
    }
}

/// Result of running an engine over one unit.
///
/// Findings are listed in the order the engine produced them. When `error` is
/// set the run stopped early and `findings` holds what was produced before.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutput {
    pub findings: Vec<Finding>,
    pub error: Option<RunError>,
}

impl RunOutput {
    /// A run that went through every rule.
    pub fn complete(findings: Vec<Finding>) -> Self {
        Self {
            findings,
            error: None,
        }
    }

    /// A run that stopped with `error` after producing `findings`.
    pub fn interrupted(findings: Vec<Finding>, error: RunError) -> Self {
        Self {
            findings,
            error: Some(error),
        }
    }
}

/// A compiled set of rules.
///
/// # Thread Safety
///
/// Engines are loaded once and then shared read-only between concurrent
/// checker runs, so implementations must be Send + Sync and `run` must not
/// mutate shared state.
pub trait RuleEngine: Send + Sync {
    /// Compiles one rule file and adds its rules.
    ///
    /// Either every rule of the file is added or none is.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Import`] when the file references a package that
    /// cannot be loaded, and [`LoadError::Dsl`] for any other violation of
    /// the rule language.
    fn load(&mut self, ctx: &ParseContext, filename: &Path, content: &str) -> Result<(), LoadError>;

    /// Matches the loaded rules against `unit`.
    fn run(&self, ctx: &RunContext<'_>, unit: &SourceUnit) -> RunOutput;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_parse_context_can_import() {
        let ctx = ParseContext::with_importable(["strings", "fmt"]);
        assert!(ctx.can_import("fmt"));
        assert!(!ctx.can_import("os"));
        assert!(!ParseContext::new().can_import("fmt"));
    }

    #[test]
    fn test_run_context_trace() {
        let lines = Mutex::new(Vec::new());
        let print = |line: &str| lines.lock().unwrap().push(line.to_string());
        let package = PackageInfo::default();
        let types = TypeInfo::default();
        let sizes = Sizes::default();
        let files = FileIndex::from_source("main.go", "");

        let ctx = RunContext {
            debug: Some("style"),
            debug_print: &print,
            package: &package,
            types: &types,
            sizes: &sizes,
            files: &files,
        };

        assert!(ctx.debug_enabled("style"));
        assert!(!ctx.debug_enabled("perf"));
        ctx.trace("hello");
        assert_eq!(*lines.lock().unwrap(), vec!["hello".to_string()]);
    }
}
