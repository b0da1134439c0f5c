use rulecheck_config::{CheckerOverrides, ConfigManager, CONFIG_FILE_NAME};
use rulecheck_fs::NativeFileSystem;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_discover_local_file_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(CONFIG_FILE_NAME),
        r#"
[checker]
rules = "rules/*.toml, extra.toml"
fail_on_error = "dsl"
order = "position"

[parse]
importable = ["fmt", "strings"]
"#,
    )
    .unwrap();

    let fs = Arc::new(NativeFileSystem::new(temp_dir.path()).unwrap());
    let manager = ConfigManager::discover_with(fs, None).unwrap();
    let config = manager.config();

    assert_eq!(config.checker.rules, "rules/*.toml, extra.toml");
    assert_eq!(config.checker.order, "position");
    assert!(config.parse_context().can_import("strings"));
    assert_eq!(manager.config_path(), Some(Path::new(CONFIG_FILE_NAME)));
}

#[test]
fn test_command_line_overrides_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("custom.toml"),
        "[checker]\nrules = \"a.toml\"\ndebug = \"style\"\n",
    )
    .unwrap();

    let fs = Arc::new(NativeFileSystem::new(temp_dir.path()).unwrap());
    let manager = ConfigManager::load_from(fs, Path::new("custom.toml"))
        .unwrap_or_else(|e| panic!("{e}"))
        .with_overrides(&CheckerOverrides {
            debug: Some(String::new()),
            ..Default::default()
        });

    let params = manager.config().to_params();
    assert_eq!(params.get("rules"), Some("a.toml"));
    assert_eq!(params.get("debug"), Some(""));
}
