// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Core type definitions shared by the resolver, the registry and the replay driver.
//!
//! All timestamps are monotonic clock readings in nanoseconds. Enumerations
//! serialize in `snake_case` so they can be attached verbatim to outgoing
//! telemetry records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A resource lifecycle notification (start or stop).
///
/// Passed by reference into the resolver and never retained beyond the call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceLifecycleEvent {
    /// Identifier of the resource, unique within a view.
    pub resource_id: String,
    /// Nanosecond timestamp at which the event was created.
    pub event_created_at_nanos: i64,
}

impl ResourceLifecycleEvent {
    /// Create a new lifecycle event.
    pub fn new(resource_id: impl Into<String>, event_created_at_nanos: i64) -> Self {
        Self {
            resource_id: resource_id.into(),
            event_created_at_nanos,
        }
    }
}

/// Why a settle duration could not be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoValueReason {
    /// No resource was started for the view.
    NoResources,
    /// Resources started, but none was classified as initial.
    NoInitialResources,
    /// At least one initial resource has not stopped or been dropped yet.
    NotSettledYet,
    /// Counters are inconsistent with a missing value.
    Unknown,
}

impl NoValueReason {
    /// Stable wire name of the reason.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoResources => "no_resources",
            Self::NoInitialResources => "no_initial_resources",
            Self::NotSettledYet => "not_settled_yet",
            Self::Unknown => "unknown",
        }
    }

    /// All reasons, in classification priority order.
    pub fn all() -> [NoValueReason; 4] {
        [
            Self::NoResources,
            Self::NoInitialResources,
            Self::NotSettledYet,
            Self::Unknown,
        ]
    }
}

impl fmt::Display for NoValueReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which initial-resource policy variant is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewInitializationMetricsConfig {
    /// Time-based policy with the default threshold.
    TimeBasedDefault,
    /// Time-based policy with a caller-supplied threshold.
    TimeBasedCustom,
    /// A caller-supplied policy.
    Custom,
}

impl ViewInitializationMetricsConfig {
    /// Stable wire name of the configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TimeBasedDefault => "time_based_default",
            Self::TimeBasedCustom => "time_based_custom",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for ViewInitializationMetricsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of querying a resolver: the value, or why there is none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewInitializationMetricsState {
    /// Settle duration in nanoseconds.
    pub initialization_time: Option<i64>,
    pub config: ViewInitializationMetricsConfig,
    /// Set only when `initialization_time` is `None`.
    pub no_value_reason: Option<NoValueReason>,
}
