// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Aggregate metrics over reported view states.
//!
//! Lightweight, dependency-free bookkeeping of how many views settled, why the
//! others did not, and how settle durations are distributed.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use crate::types::{NoValueReason, ViewInitializationMetricsState};

/// Outcome counters and settle-duration histogram.
#[derive(Debug, Default)]
pub struct ResolverMetrics {
    settled: AtomicU64,
    no_resources: AtomicU64,
    no_initial_resources: AtomicU64,
    not_settled_yet: AtomicU64,
    unknown: AtomicU64,
    durations: Mutex<Histogram>,
}

impl ResolverMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one reported state.
    pub fn record(&self, state: &ViewInitializationMetricsState) {
        match (state.initialization_time, state.no_value_reason) {
            (Some(nanos), _) => {
                self.settled.fetch_add(1, Ordering::Relaxed);
                let nanos = u64::try_from(nanos).unwrap_or(0);
                self.durations.lock().record(Duration::from_nanos(nanos));
            }
            (None, reason) => {
                self.counter(reason.unwrap_or(NoValueReason::Unknown))
                    .fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn counter(&self, reason: NoValueReason) -> &AtomicU64 {
        match reason {
            NoValueReason::NoResources => &self.no_resources,
            NoValueReason::NoInitialResources => &self.no_initial_resources,
            NoValueReason::NotSettledYet => &self.not_settled_yet,
            NoValueReason::Unknown => &self.unknown,
        }
    }

    /// Number of reports that carried a value.
    pub fn settled(&self) -> u64 {
        self.settled.load(Ordering::Relaxed)
    }

    /// Number of reports missing a value for `reason`.
    pub fn no_value(&self, reason: NoValueReason) -> u64 {
        self.counter(reason).load(Ordering::Relaxed)
    }

    /// Take a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            settled: self.settled(),
            no_value: NoValueReason::all()
                .into_iter()
                .map(|reason| (reason, self.no_value(reason)))
                .collect(),
            durations: self.durations.lock().clone(),
        }
    }

    /// Reset all metrics.
    pub fn reset(&self) {
        self.settled.store(0, Ordering::Relaxed);
        for reason in NoValueReason::all() {
            self.counter(reason).store(0, Ordering::Relaxed);
        }
        *self.durations.lock() = Histogram::default();
    }
}

/// Simple histogram with fixed buckets for settle durations.
#[derive(Debug, Clone)]
pub struct Histogram {
    /// Bucket boundaries in milliseconds.
    /// Default: [50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s, 10s, +inf]
    buckets: Vec<u64>,

    /// Count per bucket.
    counts: Vec<u64>,
}

impl Histogram {
    /// Create a histogram with custom bucket boundaries (in milliseconds).
    pub fn with_buckets(buckets: Vec<u64>) -> Self {
        let counts = vec![0; buckets.len() + 1];
        Self { buckets, counts }
    }

    /// Record a duration value.
    pub fn record(&mut self, duration: Duration) {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        let bucket_idx = self
            .buckets
            .iter()
            .position(|&b| millis <= b)
            .unwrap_or(self.buckets.len());
        self.counts[bucket_idx] += 1;
    }

    /// Get counts for each bucket.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Get bucket boundaries.
    pub fn buckets(&self) -> &[u64] {
        &self.buckets
    }

    /// Total number of recorded values.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Calculate approximate percentile (p50, p90, p99, etc.).
    pub fn percentile(&self, p: f64) -> Duration {
        let total = self.total();
        if total == 0 {
            return Duration::ZERO;
        }

        let target = (total as f64 * p / 100.0).ceil() as u64;
        let mut cumulative = 0u64;

        for (i, &count) in self.counts.iter().enumerate() {
            cumulative += count;
            if cumulative >= target {
                // Overflow bucket reports ten times the last boundary
                let millis = if i < self.buckets.len() {
                    self.buckets[i]
                } else {
                    self.buckets.last().copied().unwrap_or(0).saturating_mul(10)
                };
                return Duration::from_millis(millis);
            }
        }

        Duration::ZERO
    }

    pub fn p50(&self) -> Duration {
        self.percentile(50.0)
    }

    pub fn p90(&self) -> Duration {
        self.percentile(90.0)
    }

    pub fn p99(&self) -> Duration {
        self.percentile(99.0)
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::with_buckets(vec![50, 100, 250, 500, 1_000, 2_500, 5_000, 10_000])
    }
}

/// A snapshot of all metrics at a point in time.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    /// Reports carrying a value.
    pub settled: u64,

    /// Reports without a value, by reason, in classification order.
    pub no_value: Vec<(NoValueReason, u64)>,

    /// Settle duration distribution.
    pub durations: Histogram,
}

impl MetricsSnapshot {
    /// Total number of reports.
    pub fn total(&self) -> u64 {
        self.settled + self.no_value.iter().map(|(_, count)| count).sum::<u64>()
    }

    /// Format as a human-readable report.
    pub fn format_report(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Network Settled Report ===\n\n");
        report.push_str(&format!(
            "Views: {} reported, {} settled\n",
            self.total(),
            self.settled
        ));

        for (reason, count) in &self.no_value {
            if *count > 0 {
                report.push_str(&format!("  {}: {}\n", reason, count));
            }
        }

        if self.durations.total() > 0 {
            report.push_str(&format!(
                "Settle time: p50 {:.2?}, p90 {:.2?}, p99 {:.2?}\n",
                self.durations.p50(),
                self.durations.p90(),
                self.durations.p99()
            ));
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ViewInitializationMetricsConfig;

    fn state(value: Option<i64>, reason: Option<NoValueReason>) -> ViewInitializationMetricsState {
        ViewInitializationMetricsState {
            initialization_time: value,
            config: ViewInitializationMetricsConfig::TimeBasedDefault,
            no_value_reason: reason,
        }
    }

    #[test]
    fn test_record_outcomes() {
        let metrics = ResolverMetrics::new();
        metrics.record(&state(Some(80_000_000), None));
        metrics.record(&state(Some(0), None));
        metrics.record(&state(None, Some(NoValueReason::NotSettledYet)));
        metrics.record(&state(None, Some(NoValueReason::NoResources)));
        metrics.record(&state(None, Some(NoValueReason::NoResources)));

        assert_eq!(metrics.settled(), 2);
        assert_eq!(metrics.no_value(NoValueReason::NoResources), 2);
        assert_eq!(metrics.no_value(NoValueReason::NotSettledYet), 1);
        assert_eq!(metrics.no_value(NoValueReason::Unknown), 0);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total(), 5);
        assert_eq!(snapshot.durations.counts()[0], 1);
        assert_eq!(snapshot.durations.counts()[1], 1);
    }

    #[test]
    fn test_negative_duration_recorded_as_zero() {
        let metrics = ResolverMetrics::new();
        metrics.record(&state(Some(-5), None));
        assert_eq!(metrics.snapshot().durations.counts()[0], 1);
    }

    #[test]
    fn test_histogram_percentiles() {
        let mut hist = Histogram::default();
        for _ in 0..100 {
            hist.record(Duration::from_millis(180));
        }

        assert_eq!(hist.p50(), Duration::from_millis(250));
        assert_eq!(hist.p99(), Duration::from_millis(250));
    }

    #[test]
    fn test_histogram_overflow_bucket() {
        let mut hist = Histogram::default();
        hist.record(Duration::from_secs(60));
        assert_eq!(hist.counts()[hist.buckets().len()], 1);
        assert_eq!(hist.p50(), Duration::from_millis(100_000));
    }

    #[test]
    fn test_histogram_overflow_bucket_saturates() {
        let mut hist = Histogram::with_buckets(vec![10, u64::MAX / 2]);
        hist.record(Duration::MAX);
        assert_eq!(hist.counts()[2], 1);
        assert_eq!(hist.p99(), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = ResolverMetrics::new();
        metrics.record(&state(Some(10), None));
        metrics.record(&state(None, Some(NoValueReason::Unknown)));
        metrics.reset();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total(), 0);
        assert_eq!(snapshot.durations.total(), 0);
    }

    #[test]
    fn test_format_report() {
        let metrics = ResolverMetrics::new();
        metrics.record(&state(Some(120_000_000), None));
        metrics.record(&state(None, Some(NoValueReason::NotSettledYet)));

        let report = metrics.snapshot().format_report();
        assert!(report.contains("2 reported, 1 settled"));
        assert!(report.contains("not_settled_yet: 1"));
        assert!(!report.contains("no_resources"));
        assert!(report.contains("p50"));
    }
}
