// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Details view of a stored walk.
//!
//! Combines the record metadata with values derived from its raw samples:
//! the calculated step count and an encoded route for map clients.

use crate::db::{ActivityStore, StoreError};
use crate::models::{LocationSample, RecordId};
use crate::services::distance::track_line;
use crate::services::steps::{detect_steps, StepDetectorConfig};
use crate::time_utils::format_utc_rfc3339;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Precision used for the encoded route (Google polyline format).
const ROUTE_PRECISION: u32 = 5;

/// A stored walk with derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityDetails {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: RecordId,
    pub name: String,
    /// RFC3339 UTC
    pub start_date: String,
    /// Steps reported by the hardware step detector
    pub steps: u32,
    /// Steps counted from the accelerometer signal
    pub calculated_steps: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub elapsed_time_ms: i64,
    pub distance_meters: f64,
    pub location_count: usize,
    /// Encoded polyline of the route, empty for walks without locations
    pub route_polyline: String,
}

/// Errors from building activity details.
#[derive(Debug, thiserror::Error)]
pub enum DetailsError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to encode route: {0}")]
    Route(String),
}

/// Load a walk and compute its details.
pub async fn activity_details(
    store: &dyn ActivityStore,
    id: RecordId,
    detector: &StepDetectorConfig,
) -> Result<ActivityDetails, DetailsError> {
    let record = store.get(id).await?.ok_or(StoreError::NotFound(id))?;
    let (locations, inertial) = store.load_samples(id).await?;

    let calculated_steps = detect_steps(&inertial.accelerometer, detector);
    let route_polyline = encode_route(&locations).map_err(DetailsError::Route)?;

    tracing::debug!(
        record_id = id,
        locations = locations.len(),
        calculated_steps,
        "Built activity details"
    );

    Ok(ActivityDetails {
        id: record.id,
        name: record.name,
        start_date: format_utc_rfc3339(record.start_date),
        steps: record.step_count,
        calculated_steps,
        elapsed_time_ms: record.elapsed_time_ms,
        distance_meters: record.distance_meters,
        location_count: locations.len(),
        route_polyline,
    })
}

/// Encode the route as a polyline string.
pub fn encode_route(locations: &[LocationSample]) -> Result<String, String> {
    if locations.is_empty() {
        return Ok(String::new());
    }
    polyline::encode_coordinates(track_line(locations), ROUTE_PRECISION).map_err(|e| e.to_string())
}
