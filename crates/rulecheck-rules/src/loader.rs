//! Rule file compilation
//!
//! Turns the text of one TOML rule file into a [`RuleSet`]. Nothing from a
//! file is kept unless the whole file compiles.

use crate::matcher::CompiledMatcher;
use crate::template::MessageTemplate;
use crate::{RuleError, TomlRule, TomlRuleFile};
use rulecheck_core::{LoadError, ParseContext};
use std::collections::HashSet;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// A rule ready for matching
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub name: String,
    pub group: String,
    pub description: Option<String>,
    pub matcher: CompiledMatcher,
    pub message: MessageTemplate,
}

/// All rules compiled from one file
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub file: PathBuf,
    pub package: Option<String>,
    pub rules: Vec<CompiledRule>,
}

/// 1-based line of a byte offset
fn line_of(content: &str, offset: usize) -> usize {
    let end = offset.min(content.len());
    content.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

fn line_of_span(content: &str, span: Range<usize>) -> usize {
    line_of(content, span.start)
}

/// Compile one rule file
///
/// # Errors
///
/// - [`LoadError::Dsl`] for TOML syntax errors and invalid rules
/// - [`LoadError::Import`] when an import is not loadable through `ctx`
pub fn compile_file(ctx: &ParseContext, filename: &Path, content: &str) -> Result<RuleSet, LoadError> {
    let parsed: TomlRuleFile = toml::from_str(content).map_err(|e| {
        let line = e.span().map(|span| line_of_span(content, span));
        LoadError::dsl(filename, line, e.message().trim_end())
    })?;

    let header = parsed.package.unwrap_or_default();
    for import in &header.imports {
        if !ctx.can_import(import.get_ref()) {
            return Err(LoadError::Import {
                file: filename.to_path_buf(),
                package: import.get_ref().clone(),
            });
        }
    }

    let mut seen = HashSet::new();
    let mut rules = Vec::with_capacity(parsed.rules.len());
    for rule in &parsed.rules {
        let line = line_of_span(content, rule.name.span());
        let name = rule.name.get_ref().trim();
        if !name.is_empty() && !seen.insert(name) {
            return Err(LoadError::dsl(
                filename,
                Some(line),
                format!("duplicate rule name '{name}'"),
            ));
        }

        let compiled = compile_rule(rule).map_err(|e| {
            LoadError::dsl(filename, Some(line), format!("rule '{}': {e}", rule.name.get_ref()))
        })?;
        rules.push(compiled);
    }

    Ok(RuleSet {
        file: filename.to_path_buf(),
        package: header.name,
        rules,
    })
}

fn compile_rule(rule: &TomlRule) -> crate::Result<CompiledRule> {
    let name = rule.name.get_ref().trim();
    if name.is_empty() {
        return Err(RuleError::InvalidRule("name must not be empty".to_string()));
    }

    let matcher = CompiledMatcher::compile(&rule.matcher)?;
    let message = MessageTemplate::parse(&rule.report.message, matcher.capture_names())?;

    Ok(CompiledRule {
        name: name.to_string(),
        group: rule.group().to_string(),
        description: rule.description.clone(),
        matcher,
        message,
    })
}
