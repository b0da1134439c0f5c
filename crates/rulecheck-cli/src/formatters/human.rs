//! Human-readable formatter for check results.

use super::Formatter;
use crate::commands::{CheckOutcome, ReportedDiagnostic};
use colored::Colorize;
use rulecheck_core::DiagnosticKind;
use std::fmt::Write;

pub struct HumanFormatter;

impl Formatter for HumanFormatter {
    fn render(&self, outcome: &CheckOutcome) -> String {
        let mut out = String::new();

        for unit in &outcome.units {
            for reported in &unit.diagnostics {
                let _ = writeln!(out, "{}", format_diagnostic(reported));
            }
        }

        let findings = outcome.finding_count();
        let warnings = outcome.warning_count();
        let summary = format!(
            "{} {} in {} {}",
            findings,
            plural(findings, "finding"),
            outcome.units.len(),
            plural(outcome.units.len(), "unit"),
        );
        let summary = if findings == 0 {
            summary.green().to_string()
        } else {
            summary.red().bold().to_string()
        };
        let _ = write!(out, "{summary}");
        if warnings > 0 {
            let _ = write!(
                out,
                ", {}",
                format!("{} {}", warnings, plural(warnings, "warning")).yellow()
            );
        }
        out.push('\n');

        out
    }
}

fn format_diagnostic(reported: &ReportedDiagnostic) -> String {
    let diagnostic = &reported.diagnostic;
    let location = match reported.position {
        Some(position) => format!("{}:{}", diagnostic.path.display(), position),
        None => diagnostic.path.display().to_string(),
    };

    match diagnostic.kind {
        DiagnosticKind::Finding => format!("{}: {}", location.bold(), diagnostic.message),
        DiagnosticKind::Warning => format!(
            "{}: {} {}",
            location.bold(),
            "warning:".yellow(),
            diagnostic.message
        ),
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
