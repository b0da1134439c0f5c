//! Tests of the check command against files on disk.

use rulecheck_cli::formatters::{Formatter, HumanFormatter};
use rulecheck_cli::{run_check, CheckOptions};
use rulecheck_config::CheckerOverrides;
use rulecheck_core::DiagnosticKind;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const RULES: &str = r#"
[[rules]]
name = "no-debug-print"
[rules.match]
kind = "call"
text_pattern = '^fmt\.Println\((?P<args>.*)\)$'
[rules.report]
message = "remove debug print of $args"

[[rules]]
name = "typed-ident"
[rules.match]
kind = "ident"
type_pattern = "^int$"
[rules.report]
message = "$text is $type"
"#;

const UNIT: &str = r#"{
  "unit": {
    "path": "main.go",
    "package": "main",
    "source": "package main\nfmt.Println(x)\n",
    "nodes": [
      {"id": 0, "kind": "call", "span": {"start": 13, "end": 27}, "text": "fmt.Println(x)"},
      {"id": 1, "kind": "ident", "span": {"start": 25, "end": 26}, "text": "x"}
    ]
  },
  "types": {"1": "int"}
}"#;

fn project(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (name, content) in files {
        let path = temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    temp_dir
}

fn options(units: &[&str], rules: Option<&str>) -> CheckOptions {
    CheckOptions {
        units: units.iter().map(PathBuf::from).collect(),
        config: None,
        overrides: CheckerOverrides {
            rules: rules.map(str::to_string),
            ..Default::default()
        },
    }
}

#[test]
fn test_check_reports_sorted_findings_with_positions() {
    let dir = project(&[("rules/style.toml", RULES), ("main.json", UNIT)]);

    let outcome = run_check(&options(&["main.json"], Some("rules/*.toml")), dir.path()).unwrap();

    assert_eq!(outcome.finding_count(), 2);
    let unit = &outcome.units[0];
    assert_eq!(unit.dump, PathBuf::from("main.json"));

    let messages: Vec<_> = unit
        .diagnostics
        .iter()
        .map(|r| r.diagnostic.message.as_str())
        .collect();
    assert_eq!(messages, ["remove debug print of x", "x is int"]);

    let position = unit.diagnostics[0].position.unwrap();
    assert_eq!((position.line, position.column), (2, 1));
}

#[test]
fn test_config_file_is_discovered() {
    let dir = project(&[
        ("rules/style.toml", RULES),
        ("main.json", UNIT),
        ("rulecheck.toml", "[checker]\nrules = \"rules/*.toml\"\norder = \"position\"\n"),
    ]);

    let outcome = run_check(&options(&["main.json"], None), dir.path()).unwrap();
    assert!(outcome.has_findings());
}

#[test]
fn test_no_rules_reports_nothing() {
    let dir = project(&[("main.json", UNIT)]);

    let outcome = run_check(&options(&["main.json"], None), dir.path()).unwrap();
    assert!(!outcome.has_findings());
    assert_eq!(outcome.warning_count(), 0);
}

#[test]
fn test_missing_rules_fail_the_run() {
    let dir = project(&[("main.json", UNIT)]);

    let err = run_check(&options(&["main.json"], Some("missing-*.toml")), dir.path()).unwrap_err();
    assert!(format!("{err:#}").contains("no file matching 'missing-*.toml'"));
}

#[test]
fn test_units_keep_input_order() {
    let second = UNIT.replace("main.go", "other.go");
    let dir = project(&[
        ("rules/style.toml", RULES),
        ("a.json", UNIT),
        ("b.json", second.as_str()),
    ]);

    let outcome = run_check(&options(&["b.json", "a.json"], Some("rules/style.toml")), dir.path())
        .unwrap();

    let dumps: Vec<_> = outcome.units.iter().map(|u| u.dump.as_path()).collect();
    assert_eq!(dumps, [Path::new("b.json"), Path::new("a.json")]);
    assert_eq!(
        outcome.units[0].diagnostics[0].diagnostic.path,
        PathBuf::from("other.go")
    );
}

#[test]
fn test_human_output() {
    colored::control::set_override(false);
    let dir = project(&[("rules/style.toml", RULES), ("main.json", UNIT)]);

    let outcome = run_check(&options(&["main.json"], Some("rules/style.toml")), dir.path()).unwrap();
    let rendered = HumanFormatter.render(&outcome);

    assert!(rendered.contains("main.go:2:1: remove debug print of x\n"));
    assert!(rendered.ends_with("2 findings in 1 unit\n"));
    assert!(outcome
        .units
        .iter()
        .flat_map(|u| &u.diagnostics)
        .all(|r| r.diagnostic.kind == DiagnosticKind::Finding));
}
