// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration loading from files.
//!
//! Handles loading configuration from JSON and YAML files in various locations.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ConfigError;

use super::types::WorkspaceConfig;

/// Config file names to search for (in order).
pub const CONFIG_FILES: &[&str] = &[
    ".viewsettle.json",
    ".viewsettle.yaml",
    ".viewsettle.yml",
    ".viewsettle/config.json",
    "viewsettle.config.json",
];

/// Local config file name (for per-directory overrides).
pub const LOCAL_CONFIG_FILE: &str = ".viewsettle.local.json";

/// Global config directory name.
pub const GLOBAL_CONFIG_DIR: &str = ".viewsettle";

/// Global config file name.
pub const GLOBAL_CONFIG_FILE: &str = "config.json";

/// Load global configuration from ~/.viewsettle/config.json.
pub fn load_global_config() -> Result<Option<WorkspaceConfig>, ConfigError> {
    match dirs::home_dir() {
        Some(home) => load_global_config_from(&home),
        None => Ok(None),
    }
}

/// Load global configuration from `<home>/.viewsettle/config.json`.
pub fn load_global_config_from(home: &Path) -> Result<Option<WorkspaceConfig>, ConfigError> {
    let path = home.join(GLOBAL_CONFIG_DIR).join(GLOBAL_CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    debug!(path = %path.display(), "Loading global config");
    load_config_file(&path).map(Some)
}

/// Load workspace configuration from the first config file found in `workspace_root`.
pub fn load_workspace_config(workspace_root: &Path) -> Result<Option<WorkspaceConfig>, ConfigError> {
    for filename in CONFIG_FILES {
        let path = workspace_root.join(filename);
        if path.exists() {
            return load_config_file(&path).map(Some);
        }
    }
    Ok(None)
}

/// Load local configuration from .viewsettle.local.json.
pub fn load_local_config(workspace_root: &Path) -> Result<Option<WorkspaceConfig>, ConfigError> {
    let path = workspace_root.join(LOCAL_CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}

/// Load a configuration file (JSON or YAML).
pub fn load_config_file(path: &Path) -> Result<WorkspaceConfig, ConfigError> {
    debug!(path = %path.display(), "Loading config file");
    let content = std::fs::read_to_string(path)?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match extension.as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(ConfigError::from),
        _ => serde_json::from_str(&content).map_err(ConfigError::from),
    }
}

/// Write a workspace config file, `.viewsettle.json` unless a name is given.
pub fn save_workspace_config(
    workspace_root: &Path,
    config: &WorkspaceConfig,
    filename: Option<&str>,
) -> Result<PathBuf, ConfigError> {
    let path = workspace_root.join(filename.unwrap_or(CONFIG_FILES[0]));
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, content)?;
    Ok(path)
}

/// Example configuration with every field set to its default.
pub fn get_example_config() -> WorkspaceConfig {
    let defaults = super::ResolvedConfig::default();
    WorkspaceConfig {
        initial_resource_threshold_ms: Some(defaults.initial_resource_threshold_ms),
        max_retained_views: Some(defaults.max_retained_views),
        log_level: Some(defaults.log_level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_json_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".viewsettle.json");
        std::fs::write(&path, r#"{"initialResourceThresholdMs": 300}"#).unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.initial_resource_threshold_ms, Some(300));
    }

    #[test]
    fn test_load_yaml_config() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(".viewsettle.yaml"),
            "maxRetainedViews: 12\nlogLevel: debug\n",
        )
        .unwrap();

        let config = load_workspace_config(temp.path()).unwrap().unwrap();
        assert_eq!(config.max_retained_views, Some(12));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_json_takes_precedence_over_yaml() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".viewsettle.json"), r#"{"maxRetainedViews": 1}"#).unwrap();
        std::fs::write(temp.path().join(".viewsettle.yaml"), "maxRetainedViews: 2\n").unwrap();

        let config = load_workspace_config(temp.path()).unwrap().unwrap();
        assert_eq!(config.max_retained_views, Some(1));
    }

    #[test]
    fn test_missing_workspace_config() {
        let temp = TempDir::new().unwrap();
        assert!(load_workspace_config(temp.path()).unwrap().is_none());
        assert!(load_local_config(temp.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_json_reported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".viewsettle.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_config_file(&path), Err(ConfigError::JsonError(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let config = get_example_config();
        let path = save_workspace_config(temp.path(), &config, None).unwrap();
        assert!(path.ends_with(".viewsettle.json"));
        assert_eq!(load_config_file(&path).unwrap(), config);
    }
}
