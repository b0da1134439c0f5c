use crate::types::{CheckerOverrides, RulecheckConfig};
use rulecheck_fs::FileSystem;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "RULECHECK_CONFIG";

/// Config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "rulecheck.toml";

/// Errors that can occur during config loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    TomlDe {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config file not found at {}", .0.display())]
    ConfigNotFound(PathBuf),
}

/// Manager for rulecheck configuration
///
/// Holds the effective configuration and the file it came from, if any.
pub struct ConfigManager<F: FileSystem + ?Sized> {
    fs: Arc<F>,
    config_path: Option<PathBuf>,
    config: RulecheckConfig,
}

impl<F: FileSystem + ?Sized> ConfigManager<F> {
    /// Configuration with every default, not backed by a file
    pub fn defaults(fs: Arc<F>) -> Self {
        Self {
            fs,
            config_path: None,
            config: RulecheckConfig::default(),
        }
    }

    /// Load config from a specific path
    pub fn load_from(fs: Arc<F>, path: &Path) -> Result<Self, ConfigError> {
        if !fs.exists(path)? {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let contents = fs.read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RulecheckConfig =
            toml::from_str(&contents).map_err(|source| ConfigError::TomlDe {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::debug!(path = %path.display(), "loaded config");

        Ok(Self {
            fs,
            config_path: Some(path.to_path_buf()),
            config,
        })
    }

    /// Find the config the way the command line does
    ///
    /// Order: `$RULECHECK_CONFIG` (must exist), then `rulecheck.toml` under
    /// the filesystem root, then defaults.
    pub fn discover(fs: Arc<F>) -> Result<Self, ConfigError> {
        let explicit = std::env::var_os(CONFIG_ENV_VAR)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self::discover_with(fs, explicit.as_deref())
    }

    /// [`ConfigManager::discover`] with the explicit path supplied by the caller
    pub fn discover_with(fs: Arc<F>, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(fs, path);
        }

        let local = Path::new(CONFIG_FILE_NAME);
        if fs.exists(local)? {
            return Self::load_from(fs, local);
        }

        tracing::debug!("no config file found, using defaults");
        Ok(Self::defaults(fs))
    }

    /// Get reference to config
    pub fn config(&self) -> &RulecheckConfig {
        &self.config
    }

    /// File the config was read from
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Apply command line values and return the effective config
    pub fn with_overrides(mut self, overrides: &CheckerOverrides) -> Self {
        self.config.apply_overrides(overrides);
        self
    }

    /// The filesystem the config was read through
    pub fn fs(&self) -> &Arc<F> {
        &self.fs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulecheck_fs::MemoryFileSystem;

    #[test]
    fn test_load_from_memory() {
        let fs = Arc::new(
            MemoryFileSystem::new("/project")
                .with_file("rulecheck.toml", "[checker]\nrules = \"r.toml\"\n"),
        );
        let manager = ConfigManager::load_from(fs, Path::new("rulecheck.toml")).unwrap();
        assert_eq!(manager.config().checker.rules, "r.toml");
        assert_eq!(manager.config_path(), Some(Path::new("rulecheck.toml")));
    }

    #[test]
    fn test_load_missing() {
        let fs = Arc::new(MemoryFileSystem::new("/project"));
        let err = ConfigManager::load_from(fs, Path::new("nope.toml"))
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::ConfigNotFound(_)));
    }

    #[test]
    fn test_invalid_toml_names_file() {
        let fs = Arc::new(MemoryFileSystem::new("/project").with_file("bad.toml", "[checker"));
        let err = ConfigManager::load_from(fs, Path::new("bad.toml"))
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::TomlDe { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_discover_falls_back_to_defaults() {
        let fs = Arc::new(MemoryFileSystem::new("/project"));
        let manager = ConfigManager::discover_with(Arc::clone(&fs), None).unwrap();
        assert_eq!(manager.config(), &RulecheckConfig::default());
        assert!(manager.config_path().is_none());
        assert!(Arc::ptr_eq(manager.fs(), &fs));
    }

    #[test]
    fn test_discover_prefers_explicit_path() {
        let fs = Arc::new(
            MemoryFileSystem::new("/project")
                .with_file("rulecheck.toml", "[checker]\nrules = \"local.toml\"\n")
                .with_file("ci/rulecheck.toml", "[checker]\nrules = \"ci.toml\"\n"),
        );

        let manager = ConfigManager::discover_with(fs.clone(), None).unwrap();
        assert_eq!(manager.config().checker.rules, "local.toml");

        let manager =
            ConfigManager::discover_with(fs, Some(Path::new("ci/rulecheck.toml"))).unwrap();
        assert_eq!(manager.config().checker.rules, "ci.toml");
    }
}
