//! The `checkers` command: list what the registry offers.

use anyhow::Result;
use colored::Colorize;
use rulecheck_checker::register;
use rulecheck_core::{CheckerInfo, CheckerRegistry, ParseContext};
use rulecheck_fs::NativeFileSystem;
use rulecheck_rules::TomlRuleEngine;
use std::fmt::Write;
use std::path::Path;
use std::sync::Arc;

/// Registry with every checker this binary ships.
pub fn checker_registry_for_listing(root: &Path) -> Result<CheckerRegistry> {
    let mut registry = CheckerRegistry::new();
    register(
        &mut registry,
        Arc::new(NativeFileSystem::new(root)?),
        ParseContext::new(),
        TomlRuleEngine::new,
    )?;
    Ok(registry)
}

/// Human-readable catalog of the registered checkers.
pub fn render_checkers<'a>(infos: impl IntoIterator<Item = &'a CheckerInfo>) -> String {
    let mut out = String::new();
    for info in infos {
        let _ = writeln!(out, "{} [{}]", info.name.bold(), info.tags.join(", "));
        let _ = writeln!(out, "  {}", info.summary);
        if !info.details.is_empty() {
            let _ = writeln!(out, "  {}", info.details.dimmed());
        }
        for (name, param) in &info.params {
            let default = if param.default.is_empty() {
                "\"\"".to_string()
            } else {
                format!("{:?}", param.default)
            };
            let _ = writeln!(out, "  {} (default {})", name.cyan(), default);
            for line in param.usage.lines() {
                let _ = writeln!(out, "      {line}");
            }
        }
        if !info.note.is_empty() {
            let _ = writeln!(out, "  Note: {}", info.note);
        }
    }
    out
}
