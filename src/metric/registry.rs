// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! One resolver per view, with bounded retention of finished views.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, warn};

use super::identifier::{InitialResourceIdentifier, TimeBasedInitialResourceIdentifier};
use super::resolver::NetworkSettledMetricResolver;
use crate::telemetry::ResolverMetrics;
use crate::types::{NoValueReason, ResourceLifecycleEvent, ViewInitializationMetricsState};

/// Default number of stopped views kept around for reporting.
pub const DEFAULT_MAX_RETAINED_VIEWS: usize = 64;

/// Builds the initial-resource policy for each new view.
pub type IdentifierFactory = Arc<dyn Fn() -> Box<dyn InitialResourceIdentifier> + Send + Sync>;

/// State of one view as attached to an outgoing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewReport {
    pub view_id: String,
    #[serde(flatten)]
    pub state: ViewInitializationMetricsState,
    /// Initial resources still pending when the report was taken.
    pub pending_resources: usize,
    pub stopped: bool,
}

#[derive(Debug, Default)]
struct Views {
    active: HashMap<String, Arc<NetworkSettledMetricResolver>>,
    /// Stopped views, oldest first.
    retained: VecDeque<(String, Arc<NetworkSettledMetricResolver>)>,
}

impl Views {
    fn find(&self, view_id: &str) -> Option<Arc<NetworkSettledMetricResolver>> {
        self.active.get(view_id).cloned().or_else(|| {
            self.retained
                .iter()
                .rev()
                .find(|(id, _)| id == view_id)
                .map(|(_, resolver)| Arc::clone(resolver))
        })
    }

    fn retain(&mut self, view_id: String, resolver: Arc<NetworkSettledMetricResolver>, max: usize) {
        self.retained.retain(|(id, _)| *id != view_id);
        self.retained.push_back((view_id, resolver));
        while self.retained.len() > max {
            if let Some((evicted, _)) = self.retained.pop_front() {
                debug!(view = %evicted, "Evicted finished view");
            }
        }
    }
}

/// Tracks the network settled metric for every view of an application.
///
/// Lifecycle and resource events are routed by view id. Resource events are
/// applied outside the registry lock, so events for different views never
/// contend on more than a map lookup.
pub struct ViewMetricsRegistry {
    views: RwLock<Views>,
    identifier_factory: IdentifierFactory,
    max_retained_views: usize,
    metrics: ResolverMetrics,
}

impl ViewMetricsRegistry {
    /// Registry using the default time-based policy.
    pub fn new() -> Self {
        Self::with_threshold_ms(super::DEFAULT_INITIAL_RESOURCE_THRESHOLD_MS)
    }

    /// Registry using a time-based policy with the given threshold.
    pub fn with_threshold_ms(threshold_ms: u64) -> Self {
        Self::with_identifier_factory(Arc::new(move || {
            Box::new(TimeBasedInitialResourceIdentifier::with_threshold_ms(threshold_ms))
                as Box<dyn InitialResourceIdentifier>
        }))
    }

    /// Registry using a custom policy, built once per view.
    pub fn with_identifier_factory(identifier_factory: IdentifierFactory) -> Self {
        Self {
            views: RwLock::new(Views::default()),
            identifier_factory,
            max_retained_views: DEFAULT_MAX_RETAINED_VIEWS,
            metrics: ResolverMetrics::new(),
        }
    }

    /// Cap the number of stopped views kept for reporting (minimum 1).
    pub fn with_max_retained_views(mut self, max_retained_views: usize) -> Self {
        self.max_retained_views = max_retained_views.max(1);
        self
    }

    /// Start measuring a view.
    ///
    /// An active view with the same id is stopped and retained first.
    pub fn start_view(&self, view_id: &str, created_at_nanos: i64) {
        let resolver = Arc::new(NetworkSettledMetricResolver::from_boxed(
            (self.identifier_factory)(),
        ));
        resolver.view_was_created(created_at_nanos);

        let mut views = self.views.write();
        if let Some(previous) = views.active.insert(view_id.to_string(), resolver) {
            debug!(view = %view_id, "Replacing active view");
            Self::finish(&previous);
            views.retain(view_id.to_string(), previous, self.max_retained_views);
        }
    }

    /// Stop a view and keep it for reporting.
    ///
    /// The metric is resolved one last time before the stop, so a retained view
    /// reports the value it had at the end of its lifetime.
    pub fn stop_view(&self, view_id: &str) {
        let mut views = self.views.write();
        match views.active.remove(view_id) {
            Some(resolver) => {
                Self::finish(&resolver);
                views.retain(view_id.to_string(), resolver, self.max_retained_views);
            }
            None => debug!(view = %view_id, "Stop for unknown view ignored"),
        }
    }

    fn finish(resolver: &NetworkSettledMetricResolver) {
        let value = resolver.resolve_metric();
        resolver.view_was_stopped();
        debug!(value = ?value, "View finished");
    }

    fn active(&self, view_id: &str) -> Option<Arc<NetworkSettledMetricResolver>> {
        let resolver = self.views.read().active.get(view_id).cloned();
        if resolver.is_none() {
            debug!(view = %view_id, "Event for unknown view ignored");
        }
        resolver
    }

    pub fn resource_started(&self, view_id: &str, event: &ResourceLifecycleEvent) {
        if let Some(resolver) = self.active(view_id) {
            resolver.resource_was_started(event);
        }
    }

    pub fn resource_stopped(&self, view_id: &str, event: &ResourceLifecycleEvent) {
        if let Some(resolver) = self.active(view_id) {
            resolver.resource_was_stopped(event);
        }
    }

    pub fn resource_dropped(&self, view_id: &str, resource_id: &str) {
        if let Some(resolver) = self.active(view_id) {
            resolver.resource_was_dropped(resource_id);
        }
    }

    /// Resolver of an active or retained view.
    pub fn resolver(&self, view_id: &str) -> Option<Arc<NetworkSettledMetricResolver>> {
        self.views.read().find(view_id)
    }

    /// Report the state of a view and record it into the aggregate metrics.
    ///
    /// Every call is one emission: reporting the same view twice counts it twice
    /// in [`ResolverMetrics`], the way every view update of a view is sent on
    /// its own.
    pub fn report(&self, view_id: &str) -> Option<ViewReport> {
        let resolver = self.resolver(view_id)?;
        let state = resolver.get_state();
        if state.no_value_reason == Some(NoValueReason::Unknown) {
            warn!(
                view = %view_id,
                diagnostic = ?resolver.diagnostic(),
                "Network settled metric missing for an unknown reason"
            );
        }
        self.metrics.record(&state);
        Some(ViewReport {
            view_id: view_id.to_string(),
            state,
            pending_resources: resolver.resource_started_cache_size(),
            stopped: resolver.is_view_stopped(),
        })
    }

    /// Ids of views currently being measured, sorted.
    pub fn active_views(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.views.read().active.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Ids of retained stopped views, oldest first.
    pub fn retained_views(&self) -> Vec<String> {
        self.views
            .read()
            .retained
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn max_retained_views(&self) -> usize {
        self.max_retained_views
    }

    pub fn metrics(&self) -> &ResolverMetrics {
        &self.metrics
    }
}

impl Default for ViewMetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ViewInitializationMetricsConfig;

    fn event(id: &str, at: i64) -> ResourceLifecycleEvent {
        ResourceLifecycleEvent::new(id, at)
    }

    #[test]
    fn test_routes_events_by_view() {
        let registry = ViewMetricsRegistry::new();
        registry.start_view("home", 1_000);
        registry.start_view("cart", 2_000);

        registry.resource_started("home", &event("a", 1_050));
        registry.resource_started("cart", &event("a", 2_050));
        registry.resource_stopped("home", &event("a", 6_000));

        assert_eq!(registry.report("home").unwrap().state.initialization_time, Some(5_000));
        let cart = registry.report("cart").unwrap();
        assert_eq!(cart.state.initialization_time, None);
        assert_eq!(cart.state.no_value_reason, Some(NoValueReason::NotSettledYet));
        assert_eq!(cart.pending_resources, 1);
    }

    #[test]
    fn test_unknown_view_events_ignored() {
        let registry = ViewMetricsRegistry::new();
        registry.resource_started("ghost", &event("a", 1));
        registry.resource_dropped("ghost", "a");
        registry.stop_view("ghost");
        assert!(registry.report("ghost").is_none());
        assert!(registry.active_views().is_empty());
    }

    #[test]
    fn test_stop_view_resolves_before_stopping() {
        let registry = ViewMetricsRegistry::new();
        registry.start_view("home", 1_000);
        registry.resource_started("home", &event("a", 1_050));
        registry.resource_stopped("home", &event("a", 7_000));
        // Never reported while active
        registry.stop_view("home");

        let resolver = registry.resolver("home").unwrap();
        assert!(resolver.is_view_stopped());
        assert_eq!(resolver.resolve_metric(), Some(6_000));
    }

    #[test]
    fn test_replaced_view_resolves_before_stopping() {
        let registry = ViewMetricsRegistry::new();
        registry.start_view("home", 1_000);
        let first = registry.resolver("home").unwrap();
        first.resource_was_started(&event("a", 1_050));
        first.resource_was_stopped(&event("a", 2_500));

        registry.start_view("home", 10_000);
        assert!(first.is_view_stopped());
        assert_eq!(first.resolve_metric(), Some(1_500));
    }

    #[test]
    fn test_each_report_is_counted() {
        let registry = ViewMetricsRegistry::new();
        registry.start_view("home", 1_000);
        registry.report("home");
        registry.report("home");
        assert_eq!(registry.metrics().settled(), 2);
        assert_eq!(registry.metrics().snapshot().total(), 2);
    }

    #[test]
    fn test_stopped_view_is_retained_and_frozen() {
        let registry = ViewMetricsRegistry::new();
        registry.start_view("home", 1_000);
        registry.resource_started("home", &event("a", 1_050));
        registry.resource_stopped("home", &event("a", 3_000));
        // stop_view resolves the settled value before stopping
        registry.stop_view("home");

        registry.resource_started("home", &event("b", 3_100));
        let report = registry.report("home").unwrap();
        assert!(report.stopped);
        assert_eq!(report.state.initialization_time, Some(2_000));
        assert_eq!(registry.retained_views(), vec!["home".to_string()]);
        assert!(registry.active_views().is_empty());
    }

    #[test]
    fn test_restarting_view_uses_fresh_resolver() {
        let registry = ViewMetricsRegistry::new();
        registry.start_view("home", 1_000);
        registry.resource_started("home", &event("a", 1_050));

        registry.start_view("home", 10_000);
        let report = registry.report("home").unwrap();
        assert!(!report.stopped);
        assert_eq!(report.pending_resources, 0);
        assert_eq!(report.state.initialization_time, Some(0));
        assert_eq!(registry.retained_views(), vec!["home".to_string()]);
    }

    #[test]
    fn test_retention_is_bounded() {
        let registry = ViewMetricsRegistry::new().with_max_retained_views(2);
        for (i, id) in ["a", "b", "c"].into_iter().enumerate() {
            registry.start_view(id, i as i64 * 100);
            registry.stop_view(id);
        }
        assert_eq!(registry.retained_views(), vec!["b".to_string(), "c".to_string()]);
        assert!(registry.report("a").is_none());
    }

    #[test]
    fn test_zero_retention_is_clamped() {
        let registry = ViewMetricsRegistry::new().with_max_retained_views(0);
        assert_eq!(registry.max_retained_views(), 1);
    }

    #[test]
    fn test_reports_feed_metrics() {
        let registry = ViewMetricsRegistry::new();
        registry.start_view("home", 1_000);
        registry.report("home");
        registry.start_view("cart", 1_000);
        registry.resource_started("cart", &event("a", 1_010));
        registry.report("cart");

        assert_eq!(registry.metrics().settled(), 1);
        assert_eq!(registry.metrics().no_value(NoValueReason::NotSettledYet), 1);
    }

    #[test]
    fn test_custom_threshold_reported() {
        let registry = ViewMetricsRegistry::with_threshold_ms(250);
        registry.start_view("home", 0);
        assert_eq!(
            registry.report("home").unwrap().state.config,
            ViewInitializationMetricsConfig::TimeBasedCustom
        );
    }

    #[test]
    fn test_report_serializes_flat() {
        let registry = ViewMetricsRegistry::new();
        registry.start_view("home", 0);
        let value = serde_json::to_value(registry.report("home").unwrap()).unwrap();
        assert_eq!(value["view_id"], "home");
        assert_eq!(value["initialization_time"], 0);
        assert_eq!(value["config"], "time_based_default");
        assert_eq!(value["pending_resources"], 0);
    }
}
