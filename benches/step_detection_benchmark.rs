use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use walk_tracker::models::{AccelerometerSample, LocationSample};
use walk_tracker::services::{detect_steps, total_distance, StepDetectorConfig};

/// Ten minutes of 50 Hz accelerometer data with a step every 550 ms.
fn synthetic_walk() -> Vec<AccelerometerSample> {
    (0..30_000i64)
        .map(|i| {
            let t = i as f32 * 0.02;
            let stride = (t * std::f32::consts::TAU / 0.55).sin().max(0.0);
            AccelerometerSample::new(i * 20, 0.3, 0.1, 9.81 + 4.0 * stride)
        })
        .collect()
}

fn benchmark_step_detection(c: &mut Criterion) {
    let samples = synthetic_walk();
    let config = StepDetectorConfig::default();

    let mut group = c.benchmark_group("step_detection");

    group.bench_function("ten_minute_walk", |b| {
        b.iter(|| detect_steps(black_box(&samples), &config))
    });

    group.bench_function("one_minute_walk", |b| {
        b.iter(|| detect_steps(black_box(&samples[..3_000]), &config))
    });

    group.finish();
}

fn benchmark_distance(c: &mut Criterion) {
    // One fix per second for an hour
    let track: Vec<_> = (0..3_600i64)
        .map(|i| LocationSample::new(i * 1_000, 37.0 + i as f64 * 1e-5, -122.0 + i as f64 * 5e-6))
        .collect();

    c.bench_function("haversine_one_hour_track", |b| {
        b.iter(|| total_distance(black_box(&track)))
    });
}

criterion_group!(benches, benchmark_step_detection, benchmark_distance);
criterion_main!(benches);
