//! Rulecheck Core - shared types, the rule engine interface and the checker registry.
//!
//! This crate provides the foundational types every other rulecheck crate
//! builds on. It defines:
//!
//! - [`SourceUnit`] and [`Node`]: a parsed compilation unit as handed over by a host front end
//! - [`RuleEngine`]: Trait implemented by anything that can load rule files and match them
//! - [`Checker`] and [`CheckerRegistry`]: How a host discovers and constructs checkers
//! - [`Finding`] and [`Diagnostic`]: What comes out of a checker run
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │   rulecheck-cli     │  (Host: reads units, prints diagnostics)
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  rulecheck-checker  │  (Resolver, classifier, adapter, orderer)
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │   rulecheck-core    │  (This crate - types and traits)
//! └─────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use rulecheck_core::{CheckerParams, CheckerRegistry, DiagnosticCollector, UnitFile};
//!
//! let registry = CheckerRegistry::new();
//! // Register checkers here
//!
//! let checker = registry.build("rulecheck", &CheckerParams::new())?;
//! let (unit, ctx) = UnitFile::from_json("unit.json", "{\"unit\": {\"path\": \"main.go\"}}")?.into_parts();
//!
//! let mut sink = DiagnosticCollector::new();
//! checker.walk_file(&ctx, &unit, &mut sink);
//! println!("{} diagnostics", sink.len());
//! # Ok::<(), rulecheck_core::Error>(())
//! ```

pub mod checker;
pub mod engine;
pub mod error;
pub mod types;

// Re-export core types for convenience
pub use checker::{
    BoxError, Checker, CheckerConstructor, CheckerContext, CheckerInfo, CheckerParams,
    CheckerRegistry, Diagnostic, DiagnosticCollector, DiagnosticKind, DiagnosticSink, ParamInfo,
};
pub use engine::{ParseContext, RuleEngine, RunContext, RunOutput};
pub use error::{Error, LoadError, Result, RunError};
pub use types::{
    FileIndex, Finding, Node, NodeId, PackageInfo, Position, Sizes, SourceUnit, Span, TypeInfo,
    UnitFile,
};
