// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! View initialization metrics.
//!
//! - [`NetworkSettledMetricResolver`] - time to network settled for one view
//! - [`InitialResourceIdentifier`] - pluggable policy deciding which resources
//!   belong to a view's initial load, with [`TimeBasedInitialResourceIdentifier`]
//!   as the default
//! - [`DiagnosticSnapshot`] - counters explaining a missing value
//! - [`ViewMetricsRegistry`] - one resolver per view, bounded retention
//!
//! # Example
//!
//! ```rust
//! use viewsettle::metric::NetworkSettledMetricResolver;
//! use viewsettle::types::ResourceLifecycleEvent;
//!
//! let resolver = NetworkSettledMetricResolver::new();
//! resolver.view_was_created(1_000);
//! resolver.resource_was_started(&ResourceLifecycleEvent::new("a", 1_050));
//! assert_eq!(resolver.resolve_metric(), None);
//!
//! resolver.resource_was_stopped(&ResourceLifecycleEvent::new("a", 5_000));
//! assert_eq!(resolver.resolve_metric(), Some(4_000));
//! ```

mod diagnostic;
mod identifier;
mod registry;
mod resolver;

pub use diagnostic::DiagnosticSnapshot;
pub use identifier::{
    InitialResourceIdentifier, TimeBasedInitialResourceIdentifier,
    DEFAULT_INITIAL_RESOURCE_THRESHOLD_MS,
};
pub use registry::{IdentifierFactory, ViewMetricsRegistry, ViewReport, DEFAULT_MAX_RETAINED_VIEWS};
pub use resolver::NetworkSettledMetricResolver;
