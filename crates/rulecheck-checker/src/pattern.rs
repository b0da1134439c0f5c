//! Rule file patterns.

use std::fmt;

/// One rule file glob, as configured.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RulePattern(String);

impl RulePattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self(pattern.into().trim().to_string())
    }

    /// Splits a comma-separated list, trimming entries and dropping empty ones.
    pub fn parse_list(flag: &str) -> Vec<Self> {
        flag.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(Self::new)
            .collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RulePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        let patterns = RulePattern::parse_list(" a.toml,rules-*.toml , ,");
        assert_eq!(
            patterns,
            vec![RulePattern::new("a.toml"), RulePattern::new("rules-*.toml")]
        );
        assert!(RulePattern::parse_list("").is_empty());
    }
}
