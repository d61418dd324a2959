// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use walk_tracker::models::LocationSample;
use walk_tracker::services::total_distance;

mod common;

#[test]
fn test_fewer_than_two_points() {
    assert_eq!(total_distance(&[]), 0.0);
    assert_eq!(
        total_distance(&[LocationSample::new(0, 37.0, -122.0)]),
        0.0
    );
}

#[test]
fn test_three_point_track() {
    let distance = total_distance(&common::northward_track(0));
    assert!((distance - 222.39).abs() < 1.0, "distance was {}", distance);
}

#[test]
fn test_appending_points_never_decreases_distance() {
    // A wandering track, including a repeated fix and a backtrack
    let track = [
        (37.0, -122.0),
        (37.0005, -122.0003),
        (37.0005, -122.0003),
        (37.0001, -121.9990),
        (36.9990, -122.0010),
        (37.0020, -122.0020),
    ];
    let samples: Vec<_> = track
        .iter()
        .enumerate()
        .map(|(i, &(lat, lon))| LocationSample::new(i as i64 * 1_000, lat, lon))
        .collect();

    let mut previous = 0.0;
    for end in 1..=samples.len() {
        let distance = total_distance(&samples[..end]);
        assert!(distance >= previous);
        previous = distance;
    }
}

#[test]
fn test_order_follows_arrival() {
    // Same points, different arrival order, different path length
    let a = LocationSample::new(0, 37.0, -122.0);
    let b = LocationSample::new(1, 37.001, -122.0);
    let c = LocationSample::new(2, 37.002, -122.0);

    let forward = total_distance(&[a, b, c]);
    let zigzag = total_distance(&[a, c, b]);
    assert!(zigzag > forward);
}
