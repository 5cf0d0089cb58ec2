// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! viewsettle - time to network settled for application views.
//!
//! Given the creation instant of a view and the start/stop/drop notifications of
//! the network resources it loads, computes how long the view took until every
//! resource of its initial load settled, or explains why that value is not
//! available yet.
//!
//! # Architecture
//!
//! - [`types`] - Shared data model (lifecycle events, no-value reasons, reported state)
//! - [`error`] - Error types and result aliases
//! - [`metric`] - The resolver, the initial-resource policies and the per-view registry
//! - [`config`] - Configuration loading and merging
//! - [`telemetry`] - Logging setup and aggregate metrics
//! - [`replay`] - Replay of recorded JSON Lines traces
//!
//! # Example
//!
//! ```rust
//! use viewsettle::metric::ViewMetricsRegistry;
//! use viewsettle::types::ResourceLifecycleEvent;
//!
//! let registry = ViewMetricsRegistry::new();
//! registry.start_view("home", 1_000);
//! registry.resource_started("home", &ResourceLifecycleEvent::new("logo", 1_050));
//! registry.resource_stopped("home", &ResourceLifecycleEvent::new("logo", 8_000));
//! // Resolves the metric one last time, then stops the view
//! registry.stop_view("home");
//!
//! let report = registry.report("home").unwrap();
//! assert_eq!(report.state.initialization_time, Some(7_000));
//! ```

pub mod config;
pub mod error;
pub mod metric;
pub mod replay;
pub mod telemetry;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{ConfigError, Result, TraceError};
pub use metric::{
    InitialResourceIdentifier, NetworkSettledMetricResolver, TimeBasedInitialResourceIdentifier,
    ViewMetricsRegistry,
};
pub use types::{
    NoValueReason, ResourceLifecycleEvent, ViewInitializationMetricsConfig,
    ViewInitializationMetricsState,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
