use rulecheck_core::{CheckerParams, ParseContext};
use serde::{Deserialize, Serialize};

/// Main configuration structure, read from `rulecheck.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RulecheckConfig {
    /// Options handed to the checker
    #[serde(default)]
    pub checker: CheckerSection,

    /// What rule files may import
    #[serde(default)]
    pub parse: ParseSection,
}

/// The checker's string options, as in the registry's parameter table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CheckerSection {
    /// Comma-separated rule file globs
    #[serde(default)]
    pub rules: String,

    /// Rule group to trace
    #[serde(default)]
    pub debug: String,

    /// Comma-separated failure policy tokens
    #[serde(default)]
    pub fail_on_error: String,

    /// Finding order: "message" or "position"
    #[serde(default = "default_order")]
    pub order: String,
}

impl Default for CheckerSection {
    fn default() -> Self {
        Self {
            rules: String::new(),
            debug: String::new(),
            fail_on_error: String::new(),
            order: default_order(),
        }
    }
}

/// Packages the host can load for rule files
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ParseSection {
    #[serde(default)]
    pub importable: Vec<String>,
}

/// Values given on the command line; `None` keeps the file's value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckerOverrides {
    pub rules: Option<String>,
    pub debug: Option<String>,
    pub fail_on_error: Option<String>,
    pub order: Option<String>,
}

impl RulecheckConfig {
    /// Apply command line values on top of the file's values
    pub fn apply_overrides(&mut self, overrides: &CheckerOverrides) {
        let fields = [
            (&mut self.checker.rules, &overrides.rules),
            (&mut self.checker.debug, &overrides.debug),
            (&mut self.checker.fail_on_error, &overrides.fail_on_error),
            (&mut self.checker.order, &overrides.order),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                field.clone_from(value);
            }
        }
    }

    /// Parameters for the checker constructor
    pub fn to_params(&self) -> CheckerParams {
        CheckerParams::new()
            .with("rules", &self.checker.rules)
            .with("debug", &self.checker.debug)
            .with("fail_on_error", &self.checker.fail_on_error)
            .with("order", &self.checker.order)
    }

    /// Parse context listing the importable packages
    pub fn parse_context(&self) -> ParseContext {
        ParseContext::with_importable(self.parse.importable.iter().cloned())
    }
}

fn default_order() -> String {
    "message".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RulecheckConfig::default();
        assert_eq!(config.checker.rules, "");
        assert_eq!(config.checker.order, "message");
        assert!(config.parse.importable.is_empty());
    }

    #[test]
    fn test_parse_partial_file() {
        let config: RulecheckConfig = toml::from_str(
            r#"
[checker]
rules = "rules/*.toml"
fail_on_error = "import"
"#,
        )
        .unwrap();

        assert_eq!(config.checker.rules, "rules/*.toml");
        assert_eq!(config.checker.debug, "");
        assert_eq!(config.checker.order, "message");
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: Result<RulecheckConfig, _> = toml::from_str("[checker]\nrule = \"x\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_and_params() {
        let mut config = RulecheckConfig::default();
        config.checker.rules = "a.toml".to_string();
        config.checker.debug = "style".to_string();

        config.apply_overrides(&CheckerOverrides {
            rules: Some("b.toml".to_string()),
            fail_on_error: Some("all".to_string()),
            ..Default::default()
        });

        let params = config.to_params();
        assert_eq!(params.get("rules"), Some("b.toml"));
        assert_eq!(params.get("debug"), Some("style"));
        assert_eq!(params.get("fail_on_error"), Some("all"));
        assert_eq!(params.get("order"), Some("message"));
    }

    #[test]
    fn test_parse_context() {
        let config: RulecheckConfig =
            toml::from_str("[parse]\nimportable = [\"fmt\"]\n").unwrap();
        assert!(config.parse_context().can_import("fmt"));
        assert!(!config.parse_context().can_import("os"));
    }
}
