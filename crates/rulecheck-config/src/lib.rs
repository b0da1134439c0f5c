pub mod manager;
pub mod types;

pub use manager::{ConfigError, ConfigManager, CONFIG_ENV_VAR, CONFIG_FILE_NAME};
pub use types::{CheckerOverrides, CheckerSection, ParseSection, RulecheckConfig};
