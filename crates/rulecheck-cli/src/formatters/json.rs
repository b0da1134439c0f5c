//! JSON formatter for check results.

use super::Formatter;
use crate::commands::{CheckOutcome, ReportedDiagnostic};
use serde::Serialize;
use std::path::Path;

pub struct JsonFormatter;

/// One array entry: the diagnostic tagged with the dump it came from.
#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    dump: &'a Path,
    #[serde(flatten)]
    reported: &'a ReportedDiagnostic,
}

impl Formatter for JsonFormatter {
    fn render(&self, outcome: &CheckOutcome) -> String {
        let diagnostics: Vec<_> = outcome
            .units
            .iter()
            .flat_map(|unit| {
                unit.diagnostics.iter().map(|reported| JsonDiagnostic {
                    dump: &unit.dump,
                    reported,
                })
            })
            .collect();

        match serde_json::to_string_pretty(&diagnostics) {
            Ok(json) => json + "\n",
            Err(e) => format!("{{\"error\": {:?}}}\n", e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{ReportedDiagnostic, UnitResult};
    use rulecheck_core::{Diagnostic, DiagnosticKind, NodeId, Position, Span};
    use std::path::PathBuf;

    #[test]
    fn test_render_array() {
        let outcome = CheckOutcome {
            units: vec![UnitResult {
                dump: PathBuf::from("main.json"),
                diagnostics: vec![ReportedDiagnostic {
                    diagnostic: Diagnostic {
                        path: PathBuf::from("main.go"),
                        kind: DiagnosticKind::Finding,
                        node: Some(NodeId(3)),
                        span: Some(Span::new(4, 9)),
                        message: "avoid x".to_string(),
                    },
                    position: Some(Position { line: 1, column: 5 }),
                }],
            }],
        };

        let rendered = JsonFormatter.render(&outcome);
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        let first = &value[0];
        assert_eq!(first["path"], "main.go");
        assert_eq!(first["kind"], "finding");
        assert_eq!(first["node"], 3);
        assert_eq!(first["position"]["line"], 1);
        assert_eq!(first["dump"], "main.json");
        assert_eq!(first["message"], "avoid x");
    }

    #[cfg(unix)]
    #[test]
    fn test_unserializable_path_reports_error() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let outcome = CheckOutcome {
            units: vec![UnitResult {
                dump: PathBuf::from(OsStr::from_bytes(b"bad\xff.json")),
                diagnostics: vec![ReportedDiagnostic {
                    diagnostic: Diagnostic {
                        path: PathBuf::from("main.go"),
                        kind: DiagnosticKind::Warning,
                        node: None,
                        span: None,
                        message: "execution error: boom".to_string(),
                    },
                    position: None,
                }],
            }],
        };

        let rendered = JsonFormatter.render(&outcome);
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert!(value["error"].as_str().unwrap().contains("UTF-8"));
    }

    #[test]
    fn test_render_empty_array() {
        assert_eq!(JsonFormatter.render(&CheckOutcome::default()), "[]\n");
    }
}
