//! Rulecheck Checker - loads user rule files and reports what they find.
//!
//! This crate sits between a host and a [`RuleEngine`](rulecheck_core::RuleEngine):
//!
//! - [`FailurePolicy`]: decides which rule file failures abort construction
//! - [`RuleSetResolver`]: expands rule patterns, reads files, loads them into the engine
//! - [`RuleCheckChecker`]: runs the engine over a unit and forwards diagnostics
//! - [`OrderedFindings`]: puts findings in a deterministic order
//! - [`register`]: adds the checker to a [`CheckerRegistry`](rulecheck_core::CheckerRegistry)
//!
//! # Example
//!
//! ```no_run
//! use rulecheck_checker::{register, CHECKER_NAME};
//! use rulecheck_core::{CheckerParams, CheckerRegistry, ParseContext};
//! use rulecheck_fs::NativeFileSystem;
//! # use rulecheck_core::{LoadError, RuleEngine, RunContext, RunOutput, SourceUnit};
//! # #[derive(Default)]
//! # struct MyEngine;
//! # impl RuleEngine for MyEngine {
//! #     fn load(&mut self, _: &ParseContext, _: &std::path::Path, _: &str) -> Result<(), LoadError> { Ok(()) }
//! #     fn run(&self, _: &RunContext<'_>, _: &SourceUnit) -> RunOutput { RunOutput::default() }
//! # }
//! use std::sync::Arc;
//!
//! let mut registry = CheckerRegistry::new();
//! let fs = Arc::new(NativeFileSystem::current_dir()?);
//! register(&mut registry, fs, ParseContext::new(), MyEngine::default)?;
//!
//! let params = CheckerParams::new()
//!     .with("rules", "rules/*.toml")
//!     .with("fail_on_error", "import");
//! let checker = registry.build(CHECKER_NAME, &params)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod adapter;
pub mod error;
pub mod ordering;
pub mod pattern;
pub mod policy;
pub mod registration;
pub mod resolver;
pub mod settings;

pub use adapter::{stderr_printer, DebugPrinter, RuleCheckChecker, UnitReport};
pub use error::{CheckError, Result};
pub use ordering::{FindingOrder, OrderedFindings};
pub use pattern::RulePattern;
pub use policy::{FailureCondition, FailurePolicy};
pub use registration::{checker_info, register, CHECKER_NAME};
pub use resolver::{Resolution, RuleSetResolver, SkippedFile, MAX_RULE_FILE_SIZE};
pub use settings::{CheckerSettings, PARAM_DEBUG, PARAM_FAIL_ON_ERROR, PARAM_ORDER, PARAM_RULES};
