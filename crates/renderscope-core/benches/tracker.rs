//! Benchmarks for the render tracking hot path.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use renderscope_core::{ManualClock, RenderTracker, TrackerConfig};
use std::sync::Arc;

fn populated_tracker(components: usize) -> (Arc<ManualClock>, RenderTracker, Vec<String>) {
    let clock = Arc::new(ManualClock::new());
    let tracker = RenderTracker::new(TrackerConfig::default(), clock.clone());
    let names: Vec<String> = (0..components).map(|i| format!("Component{i}")).collect();
    for name in &names {
        tracker.track_render(name);
    }
    (clock, tracker, names)
}

fn bench_track_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("track_render");

    for size in [1, 16, 128, 1024].iter() {
        let (clock, tracker, names) = populated_tracker(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), &names, |b, names| {
            let mut i = 0;
            b.iter(|| {
                clock.advance(1.0);
                tracker.track_render(black_box(&names[i % names.len()]));
                i += 1;
            });
        });
    }

    group.finish();
}

fn bench_track_render_subscribed(c: &mut Criterion) {
    let mut group = c.benchmark_group("track_render_subscribed");

    for size in [16, 128].iter() {
        let (clock, tracker, names) = populated_tracker(*size);
        let _subscription = tracker.subscribe(|stats| {
            black_box(stats.len());
        });

        group.bench_with_input(BenchmarkId::from_parameter(size), &names, |b, names| {
            let mut i = 0;
            b.iter(|| {
                clock.advance(1.0);
                tracker.track_render(black_box(&names[i % names.len()]));
                i += 1;
            });
        });
    }

    group.finish();
}

fn bench_track_render_disabled(c: &mut Criterion) {
    let (_, tracker, _) = populated_tracker(16);
    tracker.disable();

    c.bench_function("track_render_disabled", |b| {
        b.iter(|| tracker.track_render(black_box("Component0")));
    });
}

fn bench_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("metrics");

    for size in [16, 128, 1024].iter() {
        let (clock, tracker, names) = populated_tracker(*size);
        for name in &names {
            clock.advance(2.0);
            tracker.track_render(name);
        }

        group.bench_with_input(BenchmarkId::from_parameter(size), &tracker, |b, tracker| {
            b.iter(|| black_box(tracker.metrics()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_track_render,
    bench_track_render_subscribed,
    bench_track_render_disabled,
    bench_metrics
);
criterion_main!(benches);
