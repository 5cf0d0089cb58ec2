// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration type definitions.
//!
//! Defines the structure of workspace and resolved configuration,
//! supporting JSON and YAML formats.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::metric::{DEFAULT_INITIAL_RESOURCE_THRESHOLD_MS, DEFAULT_MAX_RETAINED_VIEWS};
use crate::telemetry::parse_level;

/// Partial configuration as stored in a file.
/// Every field is optional; unset fields fall through to lower-precedence sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfig {
    /// Delay after view creation within which a resource counts as initial
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_resource_threshold_ms: Option<u64>,

    /// Number of stopped views kept for reporting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retained_views: Option<usize>,

    /// Default log level (trace, debug, info, warn, error)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfig {
    pub initial_resource_threshold_ms: u64,
    pub max_retained_views: usize,
    pub log_level: String,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            initial_resource_threshold_ms: DEFAULT_INITIAL_RESOURCE_THRESHOLD_MS,
            max_retained_views: DEFAULT_MAX_RETAINED_VIEWS,
            log_level: "warn".to_string(),
        }
    }
}

impl ResolvedConfig {
    /// Reject values the registry cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_retained_views == 0 {
            return Err(ConfigError::invalid(
                "maxRetainedViews",
                "must be at least 1",
            ));
        }
        if parse_level(&self.log_level).is_none() {
            return Err(ConfigError::invalid(
                "logLevel",
                format!("unknown level '{}'", self.log_level),
            ));
        }
        Ok(())
    }

    /// Whether the default initial-resource threshold is in effect.
    pub fn uses_default_threshold(&self) -> bool {
        self.initial_resource_threshold_ms == DEFAULT_INITIAL_RESOURCE_THRESHOLD_MS
    }
}
