//! Compiled rule matchers
//!
//! This module compiles TOML rule matchers into executable forms.
//! Regex patterns are compiled once at load time.

use crate::constants::{MAX_REGEX_LENGTH, REGEX_DFA_SIZE_LIMIT, REGEX_SIZE_LIMIT};
use crate::{Result, RuleError, RuleMatcher};
use regex::{Regex, RegexBuilder};
use rulecheck_core::{Node, RunContext, SourceUnit};
use std::collections::{BTreeMap, HashSet};

/// Compile a regex with size limits to prevent ReDoS attacks
///
/// - Pattern length limit (500 chars)
/// - Compiled regex size limit (10MB)
/// - DFA size limit (2MB)
pub(crate) fn compile_regex_safe(pattern: &str) -> Result<Regex> {
    if pattern.len() > MAX_REGEX_LENGTH {
        return Err(RuleError::InvalidPattern(format!(
            "Pattern exceeds maximum length of {} characters",
            MAX_REGEX_LENGTH
        )));
    }

    RegexBuilder::new(pattern)
        .size_limit(REGEX_SIZE_LIMIT)
        .dfa_size_limit(REGEX_DFA_SIZE_LIMIT)
        .build()
        .map_err(|e| RuleError::InvalidPattern(e.to_string()))
}

/// Outcome of evaluating a matcher against one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The node kind is not one the rule looks at
    Skipped,
    /// The node was considered and a clause rejected it
    Rejected(&'static str),
    /// Every clause held; carries the named captures of `text_pattern`
    Matched(BTreeMap<String, String>),
}

/// A compiled matcher ready for execution
#[derive(Debug, Clone)]
pub struct CompiledMatcher {
    /// Accepted node kinds
    kinds: Option<HashSet<String>>,

    /// Pre-compiled regex for node text
    text_regex: Option<Regex>,

    /// Pre-compiled regex the node text must not match
    not_text_regex: Option<Regex>,

    /// Pre-compiled regex for the node type
    type_regex: Option<Regex>,

    /// Pre-compiled regex for the unit path
    path_regex: Option<Regex>,

    /// Accepted packages
    packages: Option<HashSet<String>>,
}

impl CompiledMatcher {
    /// Compile a rule matcher
    ///
    /// # Errors
    ///
    /// Fails when the matcher has no clause at all or a pattern does not
    /// compile within the size limits.
    pub fn compile(matcher: &RuleMatcher) -> Result<Self> {
        if matcher.is_empty() {
            return Err(RuleError::InvalidRule(
                "match section must contain at least one condition".to_string(),
            ));
        }

        let compile = |field: &str, pattern: &Option<String>| -> Result<Option<Regex>> {
            pattern
                .as_deref()
                .map(|p| {
                    compile_regex_safe(p)
                        .map_err(|e| RuleError::InvalidPattern(format!("{field}: {e}")))
                })
                .transpose()
        };

        Ok(Self {
            kinds: matcher
                .kind
                .as_ref()
                .map(|kinds| kinds.iter().cloned().collect()),
            text_regex: compile("text_pattern", &matcher.text_pattern)?,
            not_text_regex: compile("not_text_pattern", &matcher.not_text_pattern)?,
            type_regex: compile("type_pattern", &matcher.type_pattern)?,
            path_regex: compile("path_pattern", &matcher.path_pattern)?,
            packages: matcher
                .package
                .as_ref()
                .map(|packages| packages.iter().cloned().collect()),
        })
    }

    /// Names of the capture groups defined by `text_pattern`
    pub fn capture_names(&self) -> impl Iterator<Item = &str> {
        self.text_regex
            .iter()
            .flat_map(|regex| regex.capture_names().flatten())
    }

    /// Evaluate all clauses against one node
    pub fn evaluate(&self, unit: &SourceUnit, node: &Node, ctx: &RunContext<'_>) -> Verdict {
        if let Some(kinds) = &self.kinds {
            if !kinds.contains(&node.kind) {
                return Verdict::Skipped;
            }
        }

        if let Some(packages) = &self.packages {
            let package = if ctx.package.name.is_empty() {
                unit.package.as_str()
            } else {
                ctx.package.name.as_str()
            };
            if !packages.contains(package) {
                return Verdict::Rejected("package");
            }
        }

        if let Some(regex) = &self.path_regex {
            if !regex.is_match(&unit.path.to_string_lossy()) {
                return Verdict::Rejected("path_pattern");
            }
        }

        let mut captures = BTreeMap::new();
        if let Some(regex) = &self.text_regex {
            let Some(caps) = regex.captures(&node.text) else {
                return Verdict::Rejected("text_pattern");
            };
            for name in regex.capture_names().flatten() {
                if let Some(value) = caps.name(name) {
                    captures.insert(name.to_string(), value.as_str().to_string());
                }
            }
        }

        if let Some(regex) = &self.not_text_regex {
            if regex.is_match(&node.text) {
                return Verdict::Rejected("not_text_pattern");
            }
        }

        if let Some(regex) = &self.type_regex {
            match ctx.types.type_of(node.id) {
                Some(ty) if regex.is_match(ty) => {}
                _ => return Verdict::Rejected("type_pattern"),
            }
        }

        Verdict::Matched(captures)
    }
}
