//! Checker trait, diagnostic sinks and the checker registry.

use crate::error::{Error, Result};
use crate::types::{FileIndex, Finding, NodeId, PackageInfo, Sizes, SourceUnit, Span, TypeInfo};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Boxed error returned by checker constructors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Host-supplied data for the unit a checker is walking.
#[derive(Debug, Clone)]
pub struct CheckerContext {
    /// Package symbol table.
    pub package: PackageInfo,
    /// Per-node type information.
    pub types: TypeInfo,
    /// Platform size information.
    pub sizes: Sizes,
    /// Position index for the unit's file.
    pub files: FileIndex,
}

/// Receives what a checker reports.
///
/// Findings and execution warnings arrive on separate channels so hosts can
/// tell rule output apart from checker trouble.
pub trait DiagnosticSink {
    /// A rule finding attached to a node.
    fn report(&mut self, unit: &SourceUnit, finding: &Finding);

    /// A warning about the unit as a whole.
    fn warn(&mut self, unit: &SourceUnit, message: &str);
}

/// Kind of a collected diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    Finding,
    Warning,
}

/// A diagnostic as stored by [`DiagnosticCollector`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// File of the unit the diagnostic belongs to.
    pub path: PathBuf,
    pub kind: DiagnosticKind,
    /// Node the diagnostic is attached to; `None` for unit-level warnings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    pub message: String,
}

/// A sink that keeps every diagnostic in arrival order.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// All diagnostics in arrival order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Rule findings only.
    pub fn findings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Finding)
    }

    /// Execution warnings only.
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::Warning)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl DiagnosticSink for DiagnosticCollector {
    fn report(&mut self, unit: &SourceUnit, finding: &Finding) {
        self.diagnostics.push(Diagnostic {
            path: unit.path.clone(),
            kind: DiagnosticKind::Finding,
            node: Some(finding.node),
            span: Some(finding.span),
            message: finding.message.clone(),
        });
    }

    fn warn(&mut self, unit: &SourceUnit, message: &str) {
        self.diagnostics.push(Diagnostic {
            path: unit.path.clone(),
            kind: DiagnosticKind::Warning,
            node: None,
            span: None,
            message: message.to_string(),
        });
    }
}

/// Trait for checkers a host can run over source units.
///
/// # Thread Safety
///
/// Implementations must be Send + Sync; hosts walk different units in
/// parallel with the same checker instance.
pub trait Checker: Send + Sync + fmt::Debug {
    /// Returns the checker name (e.g., "rulecheck").
    fn name(&self) -> &str;

    /// Checks one unit, sending everything it finds to `sink`.
    fn walk_file(&self, ctx: &CheckerContext, unit: &SourceUnit, sink: &mut dyn DiagnosticSink);
}

/// Declaration of one checker parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamInfo {
    /// Value used when the host does not set the parameter.
    pub default: String,
    /// Help text.
    pub usage: String,
}

/// Catalog entry describing a checker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckerInfo {
    pub name: String,
    pub tags: Vec<String>,
    pub summary: String,
    pub details: String,
    pub note: String,
    /// Declared parameters, by name.
    pub params: BTreeMap<String, ParamInfo>,
}

impl CheckerInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Declares a parameter.
    pub fn with_param(
        mut self,
        name: impl Into<String>,
        default: impl Into<String>,
        usage: impl Into<String>,
    ) -> Self {
        self.params.insert(
            name.into(),
            ParamInfo {
                default: default.into(),
                usage: usage.into(),
            },
        );
        self
    }
}

/// String-valued parameters handed to a checker constructor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckerParams {
    values: BTreeMap<String, String>,
}

impl CheckerParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder form of [`CheckerParams::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Returns the value of `name`, or an empty string when unset.
    pub fn string(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Builds a checker from its resolved parameters.
pub type CheckerConstructor =
    Box<dyn Fn(&CheckerParams) -> std::result::Result<Box<dyn Checker>, BoxError> + Send + Sync>;

struct RegisteredChecker {
    info: CheckerInfo,
    constructor: CheckerConstructor,
}

/// Registry of available checkers.
///
/// Hosts create one at startup and pass it to each checker crate's
/// registration function.
#[derive(Default)]
pub struct CheckerRegistry {
    checkers: Vec<RegisteredChecker>,
}

impl CheckerRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a checker.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateChecker`] if the name is taken (case insensitive).
    pub fn register(&mut self, info: CheckerInfo, constructor: CheckerConstructor) -> Result<()> {
        if self.find_by_name(&info.name).is_some() {
            return Err(Error::DuplicateChecker { name: info.name });
        }
        self.checkers.push(RegisteredChecker { info, constructor });
        Ok(())
    }

    /// Finds a checker by name.
    pub fn find_by_name(&self, name: &str) -> Option<&CheckerInfo> {
        self.checkers.iter().find_map(|entry| {
            if entry.info.name.eq_ignore_ascii_case(name) {
                Some(&entry.info)
            } else {
                None
            }
        })
    }

    /// Returns all registered checkers in registration order.
    pub fn infos(&self) -> impl Iterator<Item = &CheckerInfo> {
        self.checkers.iter().map(|entry| &entry.info)
    }

    /// Merges `overrides` over the declared defaults of `info`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownParam`] for any override the checker does not declare.
    pub fn resolve_params(info: &CheckerInfo, overrides: &CheckerParams) -> Result<CheckerParams> {
        let mut params = CheckerParams::new();
        for (name, param) in &info.params {
            params.set(name.clone(), param.default.clone());
        }
        for (name, value) in overrides.iter() {
            if !info.params.contains_key(name) {
                return Err(Error::UnknownParam {
                    checker: info.name.clone(),
                    param: name.to_string(),
                });
            }
            params.set(name, value);
        }
        Ok(params)
    }

    /// Constructs the checker called `name`.
    pub fn build(&self, name: &str, overrides: &CheckerParams) -> Result<Box<dyn Checker>> {
        let entry = self
            .checkers
            .iter()
            .find(|entry| entry.info.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownChecker {
                name: name.to_string(),
            })?;

        let params = Self::resolve_params(&entry.info, overrides)?;
        (entry.constructor)(&params).map_err(|source| Error::CheckerInit {
            checker: entry.info.name.clone(),
            source,
        })
    }
}

impl fmt::Debug for CheckerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckerRegistry")
            .field("checkers", &self.checkers.len())
            .finish()
    }
}
