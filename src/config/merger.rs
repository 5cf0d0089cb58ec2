// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration merging.
//!
//! Handles merging configurations from different sources with proper precedence.

use super::types::{ResolvedConfig, WorkspaceConfig};

/// CLI options that can override configuration.
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub initial_resource_threshold_ms: Option<u64>,
    pub max_retained_views: Option<usize>,
    pub log_level: Option<String>,
}

/// Merge multiple configurations with precedence.
///
/// Precedence (highest to lowest):
/// 1. CLI options
/// 2. Local config (.viewsettle.local.json)
/// 3. Workspace config (.viewsettle.json)
/// 4. Global config (~/.viewsettle/config.json)
/// 5. Default values
pub fn merge_config(
    global: Option<WorkspaceConfig>,
    workspace: Option<WorkspaceConfig>,
    local: Option<WorkspaceConfig>,
    cli: CliOptions,
) -> ResolvedConfig {
    let mut result = ResolvedConfig::default();

    for config in [global, workspace, local].into_iter().flatten() {
        apply_workspace_config(&mut result, &config);
    }

    apply_cli_options(&mut result, cli);

    result
}

fn apply_workspace_config(result: &mut ResolvedConfig, config: &WorkspaceConfig) {
    if let Some(threshold) = config.initial_resource_threshold_ms {
        result.initial_resource_threshold_ms = threshold;
    }

    if let Some(max) = config.max_retained_views {
        result.max_retained_views = max;
    }

    if let Some(ref level) = config.log_level {
        result.log_level = level.clone();
    }
}

fn apply_cli_options(result: &mut ResolvedConfig, cli: CliOptions) {
    if let Some(threshold) = cli.initial_resource_threshold_ms {
        result.initial_resource_threshold_ms = threshold;
    }

    if let Some(max) = cli.max_retained_views {
        result.max_retained_views = max;
    }

    if let Some(level) = cli.log_level {
        result.log_level = level;
    }
}
