// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! No sample loss when several producers feed the aggregator at once.

use std::sync::Arc;
use walk_tracker::models::{AccelerometerSample, LocationSample, StepEvent};
use walk_tracker::services::StreamAggregator;
use walk_tracker::sources::PushSources;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_interleaved_producers_lose_nothing() {
    const LOCATIONS: i64 = 500;
    const ACCEL_PER_PRODUCER: i64 = 1_000;
    const PRODUCERS: i64 = 4;

    let sources = Arc::new(PushSources::new());
    let aggregator = StreamAggregator::default();
    assert!(aggregator.start(&sources.sensor_sources()).await);

    let mut producers = Vec::new();
    for p in 0..PRODUCERS {
        let sources = sources.clone();
        producers.push(tokio::spawn(async move {
            for i in 0..ACCEL_PER_PRODUCER {
                let ts = p * ACCEL_PER_PRODUCER + i;
                assert!(sources
                    .accelerometer
                    .push(AccelerometerSample::new(ts, 0.0, 0.0, 9.81)));
                if i % 100 == 0 {
                    tokio::task::yield_now().await;
                }
            }
        }));
    }

    let location_sources = sources.clone();
    producers.push(tokio::spawn(async move {
        for i in 0..LOCATIONS {
            location_sources
                .location
                .push(LocationSample::new(i, 37.0 + i as f64 * 1e-5, -122.0));
            location_sources
                .step_detector
                .push(StepEvent { timestamp_ms: i });
        }
    }));

    for producer in producers {
        producer.await.unwrap();
    }
    assert!(aggregator.stop().await);

    let snapshot = aggregator.snapshot();
    assert_eq!(
        snapshot.inertial.accelerometer.len() as i64,
        PRODUCERS * ACCEL_PER_PRODUCER
    );
    assert_eq!(snapshot.locations.len() as i64, LOCATIONS);
    assert_eq!(snapshot.inertial.step_events.len() as i64, LOCATIONS);

    // A single producer's samples keep their order
    let locations: Vec<i64> = snapshot.locations.iter().map(|l| l.timestamp_ms).collect();
    assert!(locations.windows(2).all(|w| w[0] < w[1]));

    for p in 0..PRODUCERS {
        let own: Vec<i64> = snapshot
            .inertial
            .accelerometer
            .iter()
            .map(|s| s.timestamp_ms)
            .filter(|ts| ts / ACCEL_PER_PRODUCER == p)
            .collect();
        assert_eq!(own.len() as i64, ACCEL_PER_PRODUCER);
        assert!(own.windows(2).all(|w| w[0] < w[1]));
    }
}

#[tokio::test]
async fn test_live_counts_track_progress() {
    let sources = PushSources::new();
    let aggregator = StreamAggregator::default();
    aggregator.start(&sources.sensor_sources()).await;

    sources
        .step_detector
        .push_batch((0..10).map(|i| StepEvent { timestamp_ms: i }));
    aggregator.stop().await;

    let counts = aggregator.live_counts();
    assert_eq!(counts.step_events, 10);
    assert_eq!(counts.locations, 0);
}
