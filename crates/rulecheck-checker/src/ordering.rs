//! Deterministic ordering of findings.
//!
//! Engines may produce findings in any order. Before findings reach a sink
//! they are sorted with a stable sort, so equal keys keep the order the
//! engine produced them in.

use crate::error::{CheckError, Result};
use rulecheck_core::Finding;
use std::fmt;
use std::str::FromStr;

/// Sort key applied to the findings of one unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FindingOrder {
    /// Message text, byte-wise ascending.
    #[default]
    Message,
    /// Span start, then message text.
    Position,
}

impl FindingOrder {
    pub const VALUES: [FindingOrder; 2] = [Self::Message, Self::Position];

    pub fn token(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Position => "position",
        }
    }

    /// Parses a configured value; empty means the default.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(Self::default());
        }
        Self::VALUES
            .into_iter()
            .find(|order| order.token() == value)
            .ok_or_else(|| CheckError::InvalidOrder {
                value: value.to_string(),
                supported: Self::VALUES
                    .iter()
                    .map(|order| order.token())
                    .collect::<Vec<_>>()
                    .join(","),
            })
    }
}

impl fmt::Display for FindingOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for FindingOrder {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Findings of one unit in their final order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedFindings {
    findings: Vec<Finding>,
}

impl OrderedFindings {
    /// Sorts `findings` by `order`.
    pub fn new(mut findings: Vec<Finding>, order: FindingOrder) -> Self {
        match order {
            FindingOrder::Message => findings.sort_by(|a, b| a.message.cmp(&b.message)),
            FindingOrder::Position => findings.sort_by(|a, b| {
                a.span
                    .start
                    .cmp(&b.span.start)
                    .then_with(|| a.message.cmp(&b.message))
            }),
        }
        Self { findings }
    }

    pub fn as_slice(&self) -> &[Finding] {
        &self.findings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Finding> {
        self.findings.iter()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn into_vec(self) -> Vec<Finding> {
        self.findings
    }
}

impl IntoIterator for OrderedFindings {
    type Item = Finding;
    type IntoIter = std::vec::IntoIter<Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.findings.into_iter()
    }
}

impl<'a> IntoIterator for &'a OrderedFindings {
    type Item = &'a Finding;
    type IntoIter = std::slice::Iter<'a, Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.findings.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rulecheck_core::{NodeId, Span};

    fn finding(node: u32, start: u32, message: &str) -> Finding {
        Finding {
            node: NodeId(node),
            span: Span::new(start, start + 1),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_message_order_is_stable() {
        let ordered = OrderedFindings::new(
            vec![
                finding(1, 0, "b-msg"),
                finding(2, 5, "a-msg"),
                finding(3, 1, "a-msg"),
            ],
            FindingOrder::Message,
        );
        let nodes: Vec<_> = ordered.iter().map(|f| f.node.0).collect();
        assert_eq!(nodes, [2, 3, 1]);
    }

    #[test]
    fn test_position_order() {
        let ordered = OrderedFindings::new(
            vec![
                finding(1, 9, "a"),
                finding(2, 3, "z"),
                finding(3, 3, "m"),
            ],
            FindingOrder::Position,
        );
        let nodes: Vec<_> = ordered.iter().map(|f| f.node.0).collect();
        assert_eq!(nodes, [3, 2, 1]);
    }

    #[test]
    fn test_byte_wise_comparison() {
        let ordered = OrderedFindings::new(
            vec![finding(1, 0, "b"), finding(2, 0, "B"), finding(3, 0, "a")],
            FindingOrder::Message,
        );
        let messages: Vec<_> = ordered.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(messages, ["B", "a", "b"]);
    }

    #[test]
    fn test_parse_order() {
        assert_eq!(FindingOrder::parse("").unwrap(), FindingOrder::Message);
        assert_eq!(" position ".parse::<FindingOrder>().unwrap(), FindingOrder::Position);
        let err = FindingOrder::parse("severity").unwrap_err();
        assert!(err.to_string().contains("message,position"));
    }

    fn findings_strategy() -> impl Strategy<Value = Vec<Finding>> {
        // Small alphabet so equal messages are common
        prop::collection::vec(("[ab]{0,2}", 0u32..4), 0..24).prop_map(|items| {
            items
                .into_iter()
                .enumerate()
                .map(|(i, (message, start))| finding(i as u32, start, &message))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_message_order_sorted_stable_idempotent(findings in findings_strategy()) {
            let ordered = OrderedFindings::new(findings.clone(), FindingOrder::Message);
            prop_assert_eq!(ordered.len(), findings.len());

            for pair in ordered.as_slice().windows(2) {
                prop_assert!(pair[0].message <= pair[1].message);
                if pair[0].message == pair[1].message {
                    // Node ids record production order
                    prop_assert!(pair[0].node < pair[1].node);
                }
            }

            let again = OrderedFindings::new(ordered.clone().into_vec(), FindingOrder::Message);
            prop_assert_eq!(again, ordered);
        }

        #[test]
        fn prop_position_order_sorted_and_idempotent(findings in findings_strategy()) {
            let ordered = OrderedFindings::new(findings, FindingOrder::Position);
            for pair in ordered.as_slice().windows(2) {
                let key = |f: &Finding| (f.span.start, f.message.clone());
                prop_assert!(key(&pair[0]) <= key(&pair[1]));
            }
            let again = OrderedFindings::new(ordered.clone().into_vec(), FindingOrder::Position);
            prop_assert_eq!(again, ordered);
        }
    }
}
