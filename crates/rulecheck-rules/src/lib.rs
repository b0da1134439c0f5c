//! Rulecheck Rules - TOML rule language and reference rule engine
//!
//! This crate provides a small declarative rule language and a
//! [`TomlRuleEngine`] implementing [`rulecheck_core::RuleEngine`] for it.
//! Any other engine implementing that trait can be plugged into the
//! checker instead.
//!
//! # Architecture
//!
//! - **TOML Rules**: Declarative node matching, one or more rules per file
//! - **Compiled Matching**: Regex patterns compiled once at load time
//! - **Message Templates**: `$variables` checked at load time, rendered per finding
//!
//! # Example
//!
//! ```toml
//! # rules/debugging.toml
//! [package]
//! imports = ["fmt"]
//!
//! [[rules]]
//! name = "no-debug-print"
//! group = "debugging"
//! [rules.match]
//! kind = "call"
//! text_pattern = '^fmt\.Println\((?P<args>.*)\)$'
//! [rules.report]
//! message = "remove debug print of $args"
//! ```

pub mod constants;
pub mod engine;
pub mod loader;
pub mod matcher;
pub mod template;
pub mod toml_rule;

// Re-export core types
pub use constants::*;
pub use engine::TomlRuleEngine;
pub use loader::{compile_file, CompiledRule, RuleSet};
pub use matcher::{CompiledMatcher, Verdict};
pub use template::MessageTemplate;
pub use toml_rule::{PackageHeader, RuleMatcher, RuleReport, TomlRule, TomlRuleFile};

/// Result type for rule compilation
pub type Result<T> = std::result::Result<T, RuleError>;

/// Errors raised while compiling a single rule
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid message template: {0}")]
    InvalidTemplate(String),

    #[error("Invalid rule: {0}")]
    InvalidRule(String),
}
