// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Time-to-network-settled resolution for a single view.
//!
//! The resolver correlates resource start/stop/drop notifications, arriving from
//! any thread in any order, against the creation timestamp of one view. Its
//! output is the largest `stop - view_created` duration over every resource the
//! initial-resource policy accepted, available once none of them is pending.
//!
//! All state lives behind one lock, so every reader sees a state in which each
//! call either fully happened or did not happen at all, and the creation
//! timestamp is published to every thread once `view_was_created` returns.
//!
//! A resolver measures one view. Create a new one per view (the
//! [`ViewMetricsRegistry`](super::ViewMetricsRegistry) does this).

use std::collections::HashSet;
use std::fmt;

use parking_lot::Mutex;
use tracing::{debug, trace};

use super::diagnostic::{Diagnostic, DiagnosticSnapshot};
use super::identifier::{InitialResourceIdentifier, TimeBasedInitialResourceIdentifier};
use crate::types::{
    NoValueReason, ResourceLifecycleEvent, ViewInitializationMetricsConfig,
    ViewInitializationMetricsState,
};

/// Mutable state of one resolver.
#[derive(Debug, Default)]
struct ResolverState {
    view_created_timestamp: Option<i64>,
    /// Initial resources that neither stopped nor were dropped.
    pending_resource_ids: HashSet<String>,
    network_settle_max_value: Option<i64>,
    last_computed_metric: Option<i64>,
    view_stopped: bool,
    diagnostic: Diagnostic,
}

impl ResolverState {
    fn compute_metric(&self) -> Option<i64> {
        if self.view_created_timestamp.is_none() {
            debug!("No view was created yet, network settled time unavailable");
            return None;
        }
        if !self.pending_resource_ids.is_empty() {
            debug!(
                pending = self.pending_resource_ids.len(),
                "Not all initial resources were stopped for this view"
            );
            return None;
        }
        Some(self.network_settle_max_value.unwrap_or(0))
    }

    fn resolve_metric(&mut self) -> Option<i64> {
        if self.view_stopped {
            return self.last_computed_metric;
        }
        self.last_computed_metric = self.compute_metric();
        self.last_computed_metric
    }
}

/// Computes the time to network settled for one view.
pub struct NetworkSettledMetricResolver {
    identifier: Box<dyn InitialResourceIdentifier>,
    state: Mutex<ResolverState>,
}

impl NetworkSettledMetricResolver {
    /// Create a resolver using the default time-based policy.
    pub fn new() -> Self {
        Self::with_identifier(TimeBasedInitialResourceIdentifier::new())
    }

    /// Create a resolver with a specific initial-resource policy.
    pub fn with_identifier(identifier: impl InitialResourceIdentifier + 'static) -> Self {
        Self::from_boxed(Box::new(identifier))
    }

    /// Create a resolver from an already boxed policy.
    pub fn from_boxed(identifier: Box<dyn InitialResourceIdentifier>) -> Self {
        Self {
            identifier,
            state: Mutex::new(ResolverState::default()),
        }
    }

    /// Record the view creation instant and reset the diagnostic counters.
    ///
    /// The latest call wins. Pending resources, the running maximum and the stop
    /// latch are left untouched.
    pub fn view_was_created(&self, event_timestamp_in_nanos: i64) {
        let mut state = self.state.lock();
        if state.view_created_timestamp.is_some() {
            debug!(
                previous = ?state.view_created_timestamp,
                current = event_timestamp_in_nanos,
                "View creation timestamp replaced"
            );
        }
        state.view_created_timestamp = Some(event_timestamp_in_nanos);
        state.diagnostic = Diagnostic::default();
    }

    /// Handle a resource start.
    pub fn resource_was_started(&self, event: &ResourceLifecycleEvent) {
        let mut state = self.state.lock();
        if state.view_stopped {
            return;
        }
        state.diagnostic.record_started();
        let accepted = self.identifier.validate(
            &event.resource_id,
            event.event_created_at_nanos,
            state.view_created_timestamp,
        );
        trace!(resource = %event.resource_id, accepted, "Resource started");
        if accepted {
            state.diagnostic.record_initial();
            state.pending_resource_ids.insert(event.resource_id.clone());
        }
    }

    /// Handle a resource stop.
    ///
    /// Only resources tracked as initial contribute to the settle duration.
    pub fn resource_was_stopped(&self, event: &ResourceLifecycleEvent) {
        let mut state = self.state.lock();
        if state.view_stopped {
            return;
        }
        let was_pending = state.pending_resource_ids.remove(&event.resource_id);
        let Some(view_created) = state.view_created_timestamp else {
            return;
        };
        if !was_pending {
            return;
        }
        state.diagnostic.record_stopped();
        let duration = event.event_created_at_nanos.saturating_sub(view_created);
        if duration > state.network_settle_max_value.unwrap_or(0) {
            state.network_settle_max_value = Some(duration);
        }
        trace!(resource = %event.resource_id, duration, "Initial resource stopped");
    }

    /// Handle a dropped resource.
    pub fn resource_was_dropped(&self, resource_id: &str) {
        let mut state = self.state.lock();
        if state.view_stopped {
            return;
        }
        state.diagnostic.record_dropped();
        state.pending_resource_ids.remove(resource_id);
        trace!(resource = %resource_id, "Resource dropped");
    }

    /// Stop the view.
    ///
    /// Does not compute the metric: from now on `resolve_metric` returns the
    /// value cached by the last resolution made while the view was active, which
    /// is `None` if there was none. Later calls are no-ops.
    pub fn view_was_stopped(&self) {
        let mut state = self.state.lock();
        if state.view_stopped {
            return;
        }
        state.view_stopped = true;
        state.pending_resource_ids.clear();
        debug!(cached = ?state.last_computed_metric, "View stopped");
    }

    /// Current best estimate of the settle duration in nanoseconds.
    ///
    /// `None` until the view is created and every initial resource settled. A
    /// view without initial resources settles at `Some(0)`. Once the view is
    /// stopped, the last value resolved while it was active.
    pub fn resolve_metric(&self) -> Option<i64> {
        self.state.lock().resolve_metric()
    }

    /// The metric together with the active policy and, when the metric is
    /// missing, the reason for it.
    pub fn get_state(&self) -> ViewInitializationMetricsState {
        let (value, diagnostic) = {
            let mut state = self.state.lock();
            (state.resolve_metric(), state.diagnostic.snapshot())
        };
        ViewInitializationMetricsState {
            initialization_time: value,
            config: self.identifier.config(),
            no_value_reason: value
                .is_none()
                .then(|| diagnostic.resolve_no_value_reason()),
        }
    }

    /// Number of initial resources still pending.
    pub fn resource_started_cache_size(&self) -> usize {
        self.state.lock().pending_resource_ids.len()
    }

    /// Snapshot of the current view's diagnostic counters.
    pub fn diagnostic(&self) -> DiagnosticSnapshot {
        self.state.lock().diagnostic.snapshot()
    }

    /// The active policy descriptor.
    pub fn config(&self) -> ViewInitializationMetricsConfig {
        self.identifier.config()
    }

    /// Creation instant of the view, once known.
    pub fn view_created_timestamp(&self) -> Option<i64> {
        self.state.lock().view_created_timestamp
    }

    /// Whether `view_was_stopped` was called.
    pub fn is_view_stopped(&self) -> bool {
        self.state.lock().view_stopped
    }

    /// Reason for a missing metric, or `None` when a value is available.
    pub fn no_value_reason(&self) -> Option<NoValueReason> {
        self.get_state().no_value_reason
    }
}

impl Default for NetworkSettledMetricResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NetworkSettledMetricResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("NetworkSettledMetricResolver")
            .field("config", &self.identifier.config())
            .field("view_created_timestamp", &state.view_created_timestamp)
            .field("pending", &state.pending_resource_ids.len())
            .field("network_settle_max_value", &state.network_settle_max_value)
            .field("view_stopped", &state.view_stopped)
            .finish()
    }
}
