//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter, e.g. `rulecheck_checker=debug`.
pub const LOG_ENV_VAR: &str = "RULECHECK_LOG";

/// Default filter for a `-v` count.
pub fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Installs the fmt subscriber on stderr. Later calls are no-ops.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
