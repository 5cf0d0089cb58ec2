// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration module for viewsettle.
//!
//! Handles loading, merging, and validation of configuration from multiple sources:
//! - Global config: ~/.viewsettle/config.json
//! - Workspace config: .viewsettle.json, .viewsettle.yaml, .viewsettle/config.json, ...
//! - Local config: .viewsettle.local.json (gitignored, for personal overrides)
//! - CLI options: command-line arguments
//!
//! Configuration is merged with precedence (CLI > local > workspace > global > defaults).

mod loader;
mod merger;
mod types;

pub use loader::{
    get_example_config, load_config_file, load_global_config, load_global_config_from,
    load_local_config, load_workspace_config, save_workspace_config, CONFIG_FILES,
    GLOBAL_CONFIG_DIR, GLOBAL_CONFIG_FILE, LOCAL_CONFIG_FILE,
};
pub use merger::{merge_config, CliOptions};
pub use types::{ResolvedConfig, WorkspaceConfig};

use crate::error::ConfigError;
use crate::metric::ViewMetricsRegistry;
use std::path::Path;

/// Load, merge and validate all configuration sources for a workspace.
pub fn load_config(
    workspace_root: &Path,
    cli_options: CliOptions,
) -> Result<ResolvedConfig, ConfigError> {
    load_config_with_home(workspace_root, dirs::home_dir().as_deref(), cli_options)
}

/// Same as [`load_config`], reading the global config under `home` instead of
/// the user's home directory. `None` skips the global config.
pub fn load_config_with_home(
    workspace_root: &Path,
    home: Option<&Path>,
    cli_options: CliOptions,
) -> Result<ResolvedConfig, ConfigError> {
    let global = match home {
        Some(home) => load_global_config_from(home)?,
        None => None,
    };
    let workspace = load_workspace_config(workspace_root)?;
    let local = load_local_config(workspace_root)?;

    let config = merge_config(global, workspace, local, cli_options);
    config.validate()?;
    Ok(config)
}

impl ResolvedConfig {
    /// Build a registry honoring this configuration.
    pub fn build_registry(&self) -> ViewMetricsRegistry {
        ViewMetricsRegistry::with_threshold_ms(self.initial_resource_threshold_ms)
            .with_max_retained_views(self.max_retained_views)
    }
}
