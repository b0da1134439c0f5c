//! Checker parameters parsed into typed settings.

use crate::error::Result;
use crate::ordering::FindingOrder;
use crate::pattern::RulePattern;
use crate::policy::FailurePolicy;
use rulecheck_core::CheckerParams;

/// Comma-separated rule file globs.
pub const PARAM_RULES: &str = "rules";
/// Rule group to trace.
pub const PARAM_DEBUG: &str = "debug";
/// Comma-separated failure policy tokens.
pub const PARAM_FAIL_ON_ERROR: &str = "fail_on_error";
/// Finding order.
pub const PARAM_ORDER: &str = "order";

/// Validated checker configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckerSettings {
    pub patterns: Vec<RulePattern>,
    pub debug: Option<String>,
    pub policy: FailurePolicy,
    pub order: FindingOrder,
}

impl CheckerSettings {
    /// Validates the string parameters.
    ///
    /// The failure policy and order are checked even when no rule pattern is
    /// configured.
    pub fn from_params(params: &CheckerParams) -> Result<Self> {
        let debug = params.string(PARAM_DEBUG).trim();

        Ok(Self {
            patterns: RulePattern::parse_list(params.string(PARAM_RULES)),
            debug: (!debug.is_empty()).then(|| debug.to_string()),
            policy: FailurePolicy::parse(params.string(PARAM_FAIL_ON_ERROR))?,
            order: FindingOrder::parse(params.string(PARAM_ORDER))?,
        })
    }
}
