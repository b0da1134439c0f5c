//! The checker that runs a rule engine over source units.

use crate::error::Result;
use crate::ordering::{FindingOrder, OrderedFindings};
use crate::resolver::RuleSetResolver;
use crate::settings::CheckerSettings;
use rulecheck_core::{
    Checker, CheckerContext, DiagnosticSink, ParseContext, RuleEngine, RunContext, RunError,
    SourceUnit,
};
use rulecheck_fs::FileSystem;
use std::fmt;
use std::sync::Arc;

/// Receives debug trace lines.
pub type DebugPrinter = Arc<dyn Fn(&str) + Send + Sync>;

/// Default debug printer: one line per call on stderr.
pub fn stderr_printer() -> DebugPrinter {
    Arc::new(|line: &str| eprintln!("{line}"))
}

/// Everything one unit produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitReport {
    pub findings: OrderedFindings,
    pub execution_error: Option<RunError>,
}

/// Binds a compiled engine to the checker interface.
///
/// Without an engine every unit produces nothing.
pub struct RuleCheckChecker<E> {
    name: String,
    engine: Option<Arc<E>>,
    debug: Option<String>,
    order: FindingOrder,
    debug_print: DebugPrinter,
}

impl<E: RuleEngine> RuleCheckChecker<E> {
    pub fn new(engine: Option<Arc<E>>) -> Self {
        Self {
            name: crate::registration::CHECKER_NAME.to_string(),
            engine,
            debug: None,
            order: FindingOrder::default(),
            debug_print: stderr_printer(),
        }
    }

    /// Resolves the configured rule files into `engine` and builds the checker.
    ///
    /// With no rule pattern configured nothing is read and the checker has
    /// no engine.
    pub fn from_settings<F: FileSystem + ?Sized>(
        settings: &CheckerSettings,
        fs: &F,
        parse_ctx: &ParseContext,
        engine: E,
    ) -> Result<Self> {
        let engine = if settings.patterns.is_empty() {
            tracing::debug!("no rule patterns configured");
            None
        } else {
            RuleSetResolver::new(fs, parse_ctx, &settings.policy)
                .resolve(&settings.patterns, engine)?
                .engine
                .map(Arc::new)
        };

        Ok(Self::new(engine)
            .with_debug_group(settings.debug.clone())
            .with_order(settings.order))
    }

    pub fn with_debug_group(mut self, group: Option<String>) -> Self {
        self.debug = group;
        self
    }

    pub fn with_order(mut self, order: FindingOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_debug_printer(mut self, printer: DebugPrinter) -> Self {
        self.debug_print = printer;
        self
    }

    pub fn engine(&self) -> Option<&E> {
        self.engine.as_deref()
    }

    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    /// Runs the engine over `unit` and orders what it found.
    pub fn check_unit(&self, ctx: &CheckerContext, unit: &SourceUnit) -> UnitReport {
        let Some(engine) = &self.engine else {
            return UnitReport::default();
        };

        let run_ctx = RunContext {
            debug: self.debug.as_deref(),
            debug_print: &*self.debug_print,
            package: &ctx.package,
            types: &ctx.types,
            sizes: &ctx.sizes,
            files: &ctx.files,
        };

        let output = engine.run(&run_ctx, unit);
        tracing::debug!(
            unit = %unit.path.display(),
            findings = output.findings.len(),
            interrupted = output.error.is_some(),
            "checked unit"
        );

        UnitReport {
            findings: OrderedFindings::new(output.findings, self.order),
            execution_error: output.error,
        }
    }
}

impl<E: RuleEngine> Checker for RuleCheckChecker<E> {
    fn name(&self) -> &str {
        &self.name
    }

    fn walk_file(&self, ctx: &CheckerContext, unit: &SourceUnit, sink: &mut dyn DiagnosticSink) {
        let report = self.check_unit(ctx, unit);

        if let Some(error) = &report.execution_error {
            sink.warn(unit, &format!("execution error: {error}"));
        }
        for finding in &report.findings {
            sink.report(unit, finding);
        }
    }
}

impl<E> fmt::Debug for RuleCheckChecker<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleCheckChecker")
            .field("name", &self.name)
            .field("engine", &self.engine.is_some())
            .field("debug", &self.debug)
            .field("order", &self.order)
            .finish()
    }
}
