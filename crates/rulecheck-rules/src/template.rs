//! Message templates
//!
//! A report message may reference `$name` or `${name}`. `$$` is a literal
//! dollar sign. Variable names are checked when the rule is compiled.

use crate::{Result, RuleError};
use std::collections::BTreeMap;

/// Variables every template can reference
pub const BUILTIN_VARIABLES: &[&str] = &["text", "kind", "type", "line", "column", "package"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Var(String),
}

/// A parsed message template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    segments: Vec<Segment>,
}

impl MessageTemplate {
    /// Parse `source`, accepting builtin variables plus `captures`
    pub fn parse<'a>(source: &str, captures: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        if source.trim().is_empty() {
            return Err(RuleError::InvalidTemplate("message is empty".to_string()));
        }

        let captures: Vec<&str> = captures.into_iter().collect();
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            if c != '$' {
                literal.push(c);
                continue;
            }

            let name = match chars.peek().map(|&(_, next)| next) {
                Some('$') => {
                    chars.next();
                    literal.push('$');
                    continue;
                }
                Some('{') => {
                    chars.next();
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, next) in chars.by_ref() {
                        if next == '}' {
                            closed = true;
                            break;
                        }
                        name.push(next);
                    }
                    if !closed {
                        return Err(RuleError::InvalidTemplate(format!(
                            "unterminated '${{' at offset {offset}"
                        )));
                    }
                    name
                }
                _ => {
                    let mut name = String::new();
                    while let Some(&(_, next)) = chars.peek() {
                        if next.is_ascii_alphanumeric() || next == '_' {
                            name.push(next);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    name
                }
            };

            if name.is_empty() {
                return Err(RuleError::InvalidTemplate(format!(
                    "'$' at offset {offset} is not followed by a variable name (use '$$' for a literal '$')"
                )));
            }
            if !BUILTIN_VARIABLES.contains(&name.as_str()) && !captures.contains(&name.as_str()) {
                return Err(RuleError::InvalidTemplate(format!(
                    "unknown variable '${name}'"
                )));
            }

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Var(name));
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// Render with `vars`; variables without a value render empty
    pub fn render(&self, vars: &BTreeMap<String, String>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Var(name) => {
                    if let Some(value) = vars.get(name) {
                        out.push_str(value);
                    }
                }
            }
        }
        out
    }

    /// Variable names referenced by the template
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Var(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_both_forms() {
        let template = MessageTemplate::parse("found $text at ${line}:$column", []).unwrap();
        let rendered = template.render(&vars(&[("text", "x"), ("line", "3"), ("column", "7")]));
        assert_eq!(rendered, "found x at 3:7");
        assert_eq!(template.variables().collect::<Vec<_>>(), ["text", "line", "column"]);
    }

    #[test]
    fn test_literal_dollar() {
        let template = MessageTemplate::parse("costs $$5", []).unwrap();
        assert_eq!(template.render(&BTreeMap::new()), "costs $5");
    }

    #[test]
    fn test_captures_are_variables() {
        let template = MessageTemplate::parse("print of $args", ["args"]).unwrap();
        assert_eq!(template.render(&vars(&[("args", "x, y")])), "print of x, y");
        // Unmatched optional group renders empty
        assert_eq!(template.render(&BTreeMap::new()), "print of ");
    }

    #[test]
    fn test_errors() {
        assert!(MessageTemplate::parse("", []).is_err());
        assert!(MessageTemplate::parse("bad $", []).is_err());
        assert!(MessageTemplate::parse("bad ${text", []).is_err());
        let err = MessageTemplate::parse("uses $missing", []).unwrap_err();
        assert!(err.to_string().contains("$missing"));
    }
}
