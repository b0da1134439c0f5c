//! The `check` command: run the rule checker over unit dumps.

use anyhow::{Context, Result};
use rayon::prelude::*;
use rulecheck_checker::{register, CHECKER_NAME};
use rulecheck_config::{CheckerOverrides, ConfigManager};
use rulecheck_core::{
    Checker, CheckerRegistry, Diagnostic, DiagnosticCollector, DiagnosticKind, Position, UnitFile,
};
use rulecheck_fs::{FileSystem, NativeFileSystem};
use rulecheck_rules::TomlRuleEngine;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Options for running a check.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Unit dumps to check, in output order.
    pub units: Vec<PathBuf>,
    /// Explicit config file.
    pub config: Option<PathBuf>,
    /// Command line values for the checker parameters.
    pub overrides: CheckerOverrides,
}

/// A diagnostic with its resolved source position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportedDiagnostic {
    #[serde(flatten)]
    pub diagnostic: Diagnostic,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// Everything reported for one unit dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitResult {
    /// The dump file.
    pub dump: PathBuf,
    pub diagnostics: Vec<ReportedDiagnostic>,
}

/// Results of a whole run, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub units: Vec<UnitResult>,
}

impl CheckOutcome {
    fn count(&self, kind: DiagnosticKind) -> usize {
        self.units
            .iter()
            .flat_map(|unit| &unit.diagnostics)
            .filter(|reported| reported.diagnostic.kind == kind)
            .count()
    }

    pub fn finding_count(&self) -> usize {
        self.count(DiagnosticKind::Finding)
    }

    pub fn warning_count(&self) -> usize {
        self.count(DiagnosticKind::Warning)
    }

    pub fn has_findings(&self) -> bool {
        self.finding_count() > 0
    }
}

/// Runs the checker over every unit, resolving rule files and unit paths
/// against `root`.
pub fn run_check(options: &CheckOptions, root: &Path) -> Result<CheckOutcome> {
    let fs = Arc::new(
        NativeFileSystem::new(root)
            .with_context(|| format!("Failed to open project root {}", root.display()))?,
    );

    let manager = match &options.config {
        Some(path) => ConfigManager::load_from(fs, path),
        None => ConfigManager::discover(fs),
    }
    .context("Failed to load configuration")?
    .with_overrides(&options.overrides);
    let fs = Arc::clone(manager.fs());

    if let Some(path) = manager.config_path() {
        tracing::info!(config = %path.display(), "using config file");
    }
    let config = manager.config();

    let mut registry = CheckerRegistry::new();
    register(
        &mut registry,
        Arc::clone(&fs),
        config.parse_context(),
        TomlRuleEngine::new,
    )?;

    let checker = registry
        .build(CHECKER_NAME, &config.to_params())
        .context("Failed to set up the rule checker")?;

    let units = options
        .units
        .par_iter()
        .map(|dump| check_dump(fs.as_ref(), checker.as_ref(), dump))
        .collect::<Result<Vec<_>>>()?;

    Ok(CheckOutcome { units })
}

fn check_dump(fs: &dyn FileSystem, checker: &dyn Checker, dump: &Path) -> Result<UnitResult> {
    let contents = fs
        .read_to_string(dump)
        .with_context(|| format!("Failed to read unit dump {}", dump.display()))?;
    let (unit, ctx) = UnitFile::from_json(dump, &contents)?.into_parts();

    let mut sink = DiagnosticCollector::new();
    checker.walk_file(&ctx, &unit, &mut sink);

    let diagnostics = sink
        .into_diagnostics()
        .into_iter()
        .map(|diagnostic| ReportedDiagnostic {
            position: diagnostic.span.map(|span| ctx.files.position(span.start)),
            diagnostic,
        })
        .collect();

    Ok(UnitResult {
        dump: dump.to_path_buf(),
        diagnostics,
    })
}
