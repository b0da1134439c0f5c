//! Registration of the checker with a host registry.

use crate::adapter::RuleCheckChecker;
use crate::settings::{CheckerSettings, PARAM_DEBUG, PARAM_FAIL_ON_ERROR, PARAM_ORDER, PARAM_RULES};
use rulecheck_core::{
    BoxError, Checker, CheckerInfo, CheckerParams, CheckerRegistry, ParseContext, RuleEngine,
};
use rulecheck_fs::FileSystem;
use std::sync::Arc;

/// Name the checker is registered under.
pub const CHECKER_NAME: &str = "rulecheck";

/// Catalog entry with the parameter table.
pub fn checker_info() -> CheckerInfo {
    let mut info = CheckerInfo::new(CHECKER_NAME)
        .with_param(
            PARAM_RULES,
            "",
            "comma-separated list of rule file paths. Glob patterns such as 'rules-*.toml' may be specified",
        )
        .with_param(
            PARAM_DEBUG,
            "",
            "enable debug for the specified named rules group",
        )
        .with_param(
            PARAM_FAIL_ON_ERROR,
            "",
            "Determines the behavior when an error occurs while loading rule files.\n\
             If not set, log the error and skip rule files that contain an error.\n\
             If set, the value must be a comma-separated list of error conditions.\n\
             * 'import': a rule file refers to a package that cannot be loaded.\n\
             * 'dsl':    a rule file does not comply with the rule language.\n\
             * 'all':    any error.",
        )
        .with_param(
            PARAM_ORDER,
            "message",
            "order of findings within a unit: 'message' or 'position'",
        );

    info.tags = vec!["style".to_string(), "experimental".to_string()];
    info.summary = "Runs user-defined rules from rule files".to_string();
    info.details = "Reads rule files and turns them into checker findings.".to_string();
    info.note = "Rule files that fail to load are skipped unless fail_on_error says otherwise."
        .to_string();
    info
}

/// Registers the checker.
///
/// `make_engine` provides a fresh engine for every construction; rule files
/// are read through `fs` and may import what `parse_ctx` allows.
///
/// # Errors
///
/// Fails if a checker with the same name is already registered.
pub fn register<F, E, M>(
    registry: &mut CheckerRegistry,
    fs: Arc<F>,
    parse_ctx: ParseContext,
    make_engine: M,
) -> rulecheck_core::Result<()>
where
    F: FileSystem + ?Sized + 'static,
    E: RuleEngine + 'static,
    M: Fn() -> E + Send + Sync + 'static,
{
    registry.register(
        checker_info(),
        Box::new(
            move |params: &CheckerParams| -> Result<Box<dyn Checker>, BoxError> {
                let settings = CheckerSettings::from_params(params)?;
                let checker =
                    RuleCheckChecker::from_settings(&settings, &*fs, &parse_ctx, make_engine())?;
                Ok(Box::new(checker))
            },
        ),
    )
}
