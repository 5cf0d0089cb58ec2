// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Benchmarks for the network settled resolver and registry.
//!
//! Run with: `cargo bench --bench resolver`

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::sync::Arc;
use std::thread;

use viewsettle::{NetworkSettledMetricResolver, ResourceLifecycleEvent, ViewMetricsRegistry};

/// Benchmark a full view lifecycle with a growing number of resources.
fn bench_view_lifecycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolver/lifecycle");

    for count in [10usize, 100, 1_000] {
        let events: Vec<(ResourceLifecycleEvent, ResourceLifecycleEvent)> = (0..count)
            .map(|i| {
                let id = format!("resource-{}", i);
                (
                    ResourceLifecycleEvent::new(id.as_str(), 1_000 + i as i64),
                    ResourceLifecycleEvent::new(id.as_str(), 50_000 + i as i64),
                )
            })
            .collect();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("start_stop", count), &events, |b, events| {
            b.iter(|| {
                let resolver = NetworkSettledMetricResolver::new();
                resolver.view_was_created(1_000);
                for (start, _) in events {
                    resolver.resource_was_started(black_box(start));
                }
                for (_, stop) in events {
                    resolver.resource_was_stopped(black_box(stop));
                }
                resolver.view_was_stopped();
                black_box(resolver.get_state())
            });
        });
    }

    group.finish();
}

/// Benchmark state queries against a resolver with pending resources.
fn bench_get_state(c: &mut Criterion) {
    let resolver = NetworkSettledMetricResolver::new();
    resolver.view_was_created(1_000);
    for i in 0..100 {
        resolver.resource_was_started(&ResourceLifecycleEvent::new(format!("r{}", i), 1_010));
    }

    c.bench_function("resolver/get_state/pending_100", |b| {
        b.iter(|| black_box(resolver.get_state()));
    });
}

/// Benchmark contended stops from several threads.
fn bench_contended_stops(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolver/contended");
    let threads = 4usize;
    let per_thread = 250usize;
    group.throughput(Throughput::Elements((threads * per_thread) as u64));

    group.bench_function("stop_4x250", |b| {
        b.iter(|| {
            let resolver = Arc::new(NetworkSettledMetricResolver::new());
            resolver.view_was_created(0);
            for t in 0..threads {
                for i in 0..per_thread {
                    resolver.resource_was_started(&ResourceLifecycleEvent::new(format!("{t}-{i}"), 1));
                }
            }
            let handles: Vec<_> = (0..threads)
                .map(|t| {
                    let resolver = Arc::clone(&resolver);
                    thread::spawn(move || {
                        for i in 0..per_thread {
                            resolver.resource_was_stopped(&ResourceLifecycleEvent::new(
                                format!("{t}-{i}"),
                                (t * per_thread + i) as i64,
                            ));
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }
            black_box(resolver.resolve_metric())
        });
    });

    group.finish();
}

/// Benchmark routing events through the registry.
fn bench_registry_routing(c: &mut Criterion) {
    let registry = ViewMetricsRegistry::new();
    for v in 0..32 {
        registry.start_view(&format!("view-{}", v), 0);
    }
    let event = ResourceLifecycleEvent::new("shared", 10);

    c.bench_function("registry/route_start_stop", |b| {
        b.iter(|| {
            registry.resource_started(black_box("view-17"), &event);
            registry.resource_stopped(black_box("view-17"), &event);
        });
    });
}

criterion_group!(
    benches,
    bench_view_lifecycle,
    bench_get_state,
    bench_contended_stops,
    bench_registry_routing
);
criterion_main!(benches);
