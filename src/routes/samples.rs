// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sample ingestion.
//!
//! Each endpoint takes a JSON array of samples and forwards it to the
//! matching push source. Samples arriving while nothing is recording are
//! dropped and reported as not accepted.

use crate::error::{AppError, Result};
use crate::models::{AccelerometerSample, GyroscopeSample, LocationSample, StepEvent};
use crate::sources::PushSource;
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/samples/location", post(push_locations))
        .route("/api/samples/accelerometer", post(push_accelerometer))
        .route("/api/samples/gyroscope", post(push_gyroscope))
        .route("/api/samples/steps", post(push_steps))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct IngestResponse {
    pub received: usize,
    /// Samples handed to a recording; zero when not recording
    pub accepted: usize,
}

fn forward<T: Send + 'static>(source: &PushSource<T>, samples: Vec<T>) -> Json<IngestResponse> {
    let received = samples.len();
    let accepted = source.push_batch(samples);
    if accepted < received {
        tracing::debug!(
            received,
            accepted,
            "Dropped samples, no recording in progress"
        );
    }
    Json(IngestResponse { received, accepted })
}

async fn push_locations(
    State(state): State<Arc<AppState>>,
    Json(samples): Json<Vec<LocationSample>>,
) -> Result<Json<IngestResponse>> {
    if let Some(bad) = samples.iter().find(|s| !valid_coordinates(s)) {
        return Err(AppError::BadRequest(format!(
            "Invalid coordinates at {}: ({}, {})",
            bad.timestamp_ms, bad.latitude, bad.longitude
        )));
    }
    Ok(forward(&state.sources.location, samples))
}

async fn push_accelerometer(
    State(state): State<Arc<AppState>>,
    Json(samples): Json<Vec<AccelerometerSample>>,
) -> Result<Json<IngestResponse>> {
    if samples
        .iter()
        .any(|s| !(s.x.is_finite() && s.y.is_finite() && s.z.is_finite()))
    {
        return Err(AppError::BadRequest(
            "Accelerometer values must be finite".to_string(),
        ));
    }
    Ok(forward(&state.sources.accelerometer, samples))
}

async fn push_gyroscope(
    State(state): State<Arc<AppState>>,
    Json(samples): Json<Vec<GyroscopeSample>>,
) -> Json<IngestResponse> {
    forward(&state.sources.gyroscope, samples)
}

async fn push_steps(
    State(state): State<Arc<AppState>>,
    Json(samples): Json<Vec<StepEvent>>,
) -> Json<IngestResponse> {
    forward(&state.sources.step_detector, samples)
}

fn valid_coordinates(sample: &LocationSample) -> bool {
    (-90.0..=90.0).contains(&sample.latitude) && (-180.0..=180.0).contains(&sample.longitude)
}
