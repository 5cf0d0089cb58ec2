// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Initial-resource classification policies.

use crate::types::ViewInitializationMetricsConfig;

/// Default delay after view creation within which a started resource counts as
/// part of the initial load.
pub const DEFAULT_INITIAL_RESOURCE_THRESHOLD_MS: u64 = 100;

const NANOS_PER_MILLI: i64 = 1_000_000;

/// Decides whether a resource belongs to the initial load of a view.
///
/// Implementations are called while the resolver holds its state lock, so they
/// must not call back into the resolver.
#[cfg_attr(test, mockall::automock)]
pub trait InitialResourceIdentifier: Send + Sync {
    /// Classify a resource that started at `resource_start_nanos`.
    ///
    /// Must return `false` when `view_created_nanos` is `None`.
    fn validate(
        &self,
        resource_id: &str,
        resource_start_nanos: i64,
        view_created_nanos: Option<i64>,
    ) -> bool;

    /// The configuration descriptor reported alongside the metric.
    fn config(&self) -> ViewInitializationMetricsConfig {
        ViewInitializationMetricsConfig::Custom
    }
}

/// Accepts resources started no later than a fixed delay after view creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeBasedInitialResourceIdentifier {
    threshold_ms: u64,
}

impl TimeBasedInitialResourceIdentifier {
    /// Create an identifier using [`DEFAULT_INITIAL_RESOURCE_THRESHOLD_MS`].
    pub fn new() -> Self {
        Self::with_threshold_ms(DEFAULT_INITIAL_RESOURCE_THRESHOLD_MS)
    }

    /// Create an identifier with a custom threshold in milliseconds.
    pub fn with_threshold_ms(threshold_ms: u64) -> Self {
        Self { threshold_ms }
    }

    /// Threshold in milliseconds.
    pub fn threshold_ms(&self) -> u64 {
        self.threshold_ms
    }

    /// Threshold in nanoseconds, saturating at `i64::MAX`.
    pub fn threshold_nanos(&self) -> i64 {
        i64::try_from(self.threshold_ms)
            .unwrap_or(i64::MAX)
            .saturating_mul(NANOS_PER_MILLI)
    }

    /// Whether the default threshold is in effect.
    pub fn default_threshold_used(&self) -> bool {
        self.threshold_ms == DEFAULT_INITIAL_RESOURCE_THRESHOLD_MS
    }
}

impl Default for TimeBasedInitialResourceIdentifier {
    fn default() -> Self {
        Self::new()
    }
}

impl InitialResourceIdentifier for TimeBasedInitialResourceIdentifier {
    fn validate(
        &self,
        _resource_id: &str,
        resource_start_nanos: i64,
        view_created_nanos: Option<i64>,
    ) -> bool {
        let Some(view_created) = view_created_nanos else {
            return false;
        };
        resource_start_nanos.saturating_sub(view_created) <= self.threshold_nanos()
    }

    fn config(&self) -> ViewInitializationMetricsConfig {
        if self.default_threshold_used() {
            ViewInitializationMetricsConfig::TimeBasedDefault
        } else {
            ViewInitializationMetricsConfig::TimeBasedCustom
        }
    }
}
