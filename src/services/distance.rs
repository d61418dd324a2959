// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Walked distance from GPS fixes.
//!
//! Sums haversine distances between consecutive fixes in arrival order.
//! There is no outlier rejection: a single bad fix far from the track
//! inflates the total.

use crate::models::LocationSample;
use geo::{Distance, Haversine, LineString};

/// Total great-circle distance in meters.
pub fn total_distance(points: &[LocationSample]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    points
        .windows(2)
        .map(|pair| Haversine.distance(pair[0].point(), pair[1].point()))
        .sum()
}

/// The track as a line string, for polyline encoding.
pub fn track_line(points: &[LocationSample]) -> LineString<f64> {
    points
        .iter()
        .map(|p| (p.longitude, p.latitude))
        .collect::<Vec<_>>()
        .into()
}
