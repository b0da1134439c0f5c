//! Rule engine - applies compiled rules to source units
//!
//! This is the execution engine that takes TOML rule files and applies them
//! to the nodes of one source unit.

use crate::constants::MAX_FINDINGS_PER_UNIT;
use crate::loader::{compile_file, CompiledRule, RuleSet};
use crate::matcher::Verdict;
use rulecheck_core::{
    Finding, LoadError, Node, ParseContext, RuleEngine, RunContext, RunError, RunOutput,
    SourceUnit,
};
use std::collections::BTreeMap;
use std::path::Path;

/// The reference engine executing TOML rules
#[derive(Debug, Clone, Default)]
pub struct TomlRuleEngine {
    sets: Vec<RuleSet>,
}

impl TomlRuleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of loaded rules
    pub fn rule_count(&self) -> usize {
        self.sets.iter().map(|set| set.rules.len()).sum()
    }

    /// Loaded rule files, in load order
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.sets.iter().map(|set| set.file.as_path())
    }

    fn variables(
        rule_captures: BTreeMap<String, String>,
        unit: &SourceUnit,
        node: &Node,
        ctx: &RunContext<'_>,
    ) -> BTreeMap<String, String> {
        let position = ctx.files.position(node.span.start);
        let package = if ctx.package.name.is_empty() {
            unit.package.clone()
        } else {
            ctx.package.name.clone()
        };

        // Captures win over builtins of the same name
        let mut vars = BTreeMap::from([
            ("text".to_string(), node.text.clone()),
            ("kind".to_string(), node.kind.clone()),
            (
                "type".to_string(),
                ctx.types.type_of(node.id).unwrap_or_default().to_string(),
            ),
            ("line".to_string(), position.line.to_string()),
            ("column".to_string(), position.column.to_string()),
            ("package".to_string(), package),
        ]);
        vars.extend(rule_captures);
        vars
    }

    fn evaluate(
        file: &Path,
        rule: &CompiledRule,
        unit: &SourceUnit,
        node: &Node,
        ctx: &RunContext<'_>,
    ) -> Option<Finding> {
        let verdict = rule.matcher.evaluate(unit, node, ctx);
        let tracing_group = ctx.debug_enabled(&rule.group);

        match verdict {
            Verdict::Skipped => None,
            Verdict::Rejected(clause) => {
                if tracing_group {
                    ctx.trace(&format!(
                        "{}: {}: rejected node {}: {}",
                        file.display(),
                        rule.name,
                        node.id,
                        clause
                    ));
                }
                None
            }
            Verdict::Matched(captures) => {
                if tracing_group {
                    ctx.trace(&format!(
                        "{}: {}: matched node {}",
                        file.display(),
                        rule.name,
                        node.id
                    ));
                }
                let vars = Self::variables(captures, unit, node, ctx);
                Some(Finding::new(node, rule.message.render(&vars)))
            }
        }
    }
}

impl RuleEngine for TomlRuleEngine {
    fn load(&mut self, ctx: &ParseContext, filename: &Path, content: &str) -> Result<(), LoadError> {
        let set = compile_file(ctx, filename, content)?;
        tracing::debug!(
            file = %filename.display(),
            rules = set.rules.len(),
            "loaded rule file"
        );
        self.sets.push(set);
        Ok(())
    }

    fn run(&self, ctx: &RunContext<'_>, unit: &SourceUnit) -> RunOutput {
        let mut findings = Vec::new();

        for node in &unit.nodes {
            for set in &self.sets {
                for rule in &set.rules {
                    let Some(finding) = Self::evaluate(&set.file, rule, unit, node, ctx) else {
                        continue;
                    };

                    if findings.len() == MAX_FINDINGS_PER_UNIT {
                        return RunOutput::interrupted(
                            findings,
                            RunError::new(format!(
                                "{}: more than {} findings at rule '{}' on node {}",
                                unit.path.display(),
                                MAX_FINDINGS_PER_UNIT,
                                rule.name,
                                node.id
                            )),
                        );
                    }
                    findings.push(finding);
                }
            }
        }

        tracing::debug!(
            unit = %unit.path.display(),
            findings = findings.len(),
            "ran rules"
        );
        RunOutput::complete(findings)
    }
}
