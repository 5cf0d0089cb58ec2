// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Logging and aggregate metrics.
//!
//! - **Tracing**: structured logging through `tracing`, configured once by the binary
//! - **Metrics**: outcome counters and a settle-duration histogram per registry
//!
//! ```rust,ignore
//! use viewsettle::telemetry::{init_telemetry, TelemetryConfig};
//!
//! init_telemetry(&TelemetryConfig::default())?;
//! ```

mod init;
pub mod metrics;

pub use init::{init_telemetry, parse_level, LogFormat, TelemetryConfig};
pub use metrics::{Histogram, MetricsSnapshot, ResolverMetrics};
