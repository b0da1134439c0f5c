//! TOML rule definitions and types
//!
//! This module defines the structure of rules as they appear in TOML files.
//! Unknown keys are rejected so that typos surface as load errors instead of
//! silently disabling a clause.

use serde::{Deserialize, Serialize};
use toml::Spanned;

/// A complete TOML rule file
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TomlRuleFile {
    /// Package header (optional)
    #[serde(default)]
    pub package: Option<PackageHeader>,

    /// List of rules
    #[serde(default)]
    pub rules: Vec<TomlRule>,
}

/// Package header of a rule file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PackageHeader {
    /// Informational name of the rule package
    #[serde(default)]
    pub name: Option<String>,

    /// Packages the rules depend on; each must be loadable by the host
    #[serde(default)]
    pub imports: Vec<Spanned<String>>,
}

/// A single TOML rule
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TomlRule {
    /// Rule name, unique within its file
    pub name: Spanned<String>,

    /// Group used to select rules for debug tracing (defaults to the name)
    #[serde(default)]
    pub group: Option<String>,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Matching conditions
    #[serde(rename = "match")]
    pub matcher: RuleMatcher,

    /// What to report when matched
    pub report: RuleReport,
}

impl TomlRule {
    /// Effective group name
    pub fn group(&self) -> &str {
        self.group.as_deref().unwrap_or(self.name.get_ref())
    }
}

/// Rule matching conditions (all present conditions must hold)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RuleMatcher {
    /// Node kind must be one of these (single string or array)
    #[serde(default, deserialize_with = "deserialize_string_or_list")]
    pub kind: Option<Vec<String>>,

    /// Node text must match this regex pattern; named groups become message variables
    #[serde(default)]
    pub text_pattern: Option<String>,

    /// Node text must NOT match this regex pattern
    #[serde(default)]
    pub not_text_pattern: Option<String>,

    /// Type of the node must match this regex pattern
    #[serde(default)]
    pub type_pattern: Option<String>,

    /// Path of the unit must match this regex pattern
    #[serde(default)]
    pub path_pattern: Option<String>,

    /// Package of the unit must be one of these (single string or array)
    #[serde(default, deserialize_with = "deserialize_string_or_list")]
    pub package: Option<Vec<String>>,
}

impl RuleMatcher {
    /// Returns true when no condition is set
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.text_pattern.is_none()
            && self.not_text_pattern.is_none()
            && self.type_pattern.is_none()
            && self.path_pattern.is_none()
            && self.package.is_none()
    }
}

/// Custom deserializer that accepts both String and Vec<String>
fn deserialize_string_or_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct StringOrListVisitor;

    impl<'de> Visitor<'de> for StringOrListVisitor {
        type Value = Option<Vec<String>>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or array of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(vec![value.to_string()]))
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(vec![value]))
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(elem) = seq.next_element()? {
                vec.push(elem);
            }
            Ok(Some(vec))
        }
    }

    deserializer.deserialize_any(StringOrListVisitor)
}

/// Report configuration from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RuleReport {
    /// Message template, e.g. "avoid $text at line $line"
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rule_file() {
        let file: TomlRuleFile = toml::from_str(
            r#"
[package]
name = "style"
imports = ["strings"]

[[rules]]
name = "no-println"
[rules.match]
kind = ["call", "macro"]
text_pattern = "^println!"
[rules.report]
message = "avoid println"
"#,
        )
        .unwrap();

        let package = file.package.unwrap();
        assert_eq!(package.imports[0].get_ref(), "strings");
        assert_eq!(file.rules.len(), 1);
        assert_eq!(file.rules[0].group(), "no-println");
        assert_eq!(
            file.rules[0].matcher.kind,
            Some(vec!["call".to_string(), "macro".to_string()])
        );
    }

    #[test]
    fn test_kind_accepts_single_string() {
        let matcher: RuleMatcher = toml::from_str(r#"kind = "call""#).unwrap();
        assert_eq!(matcher.kind, Some(vec!["call".to_string()]));
        assert!(!matcher.is_empty());
        assert!(RuleMatcher::default().is_empty());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result: std::result::Result<RuleMatcher, _> = toml::from_str(r#"text_patern = "x""#);
        assert!(result.is_err());
    }
}
