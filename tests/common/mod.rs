// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;
use walk_tracker::config::Config;
use walk_tracker::db::MemoryActivityStore;
use walk_tracker::models::{AccelerometerSample, LocationSample};
use walk_tracker::routes::create_router;
use walk_tracker::services::{ForegroundNotifier, LogNotifier};
use walk_tracker::time_utils::ManualClock;
use walk_tracker::AppState;

/// Start of every test walk: 2024-05-01T08:00:00Z.
#[allow(dead_code)]
pub const WALK_START_MS: i64 = 1_714_550_400_000;

/// Accelerometer sampling interval used by the generators.
#[allow(dead_code)]
pub const SAMPLE_INTERVAL_MS: i64 = 20;

/// Vertical acceleration added around each step, centered on the 4th value.
#[allow(dead_code)]
const STEP_BUMP: [f32; 7] = [1.25, 2.5, 3.75, 5.0, 3.75, 2.5, 1.25];

/// Test app wired to in-memory collaborators.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub store: Arc<MemoryActivityStore>,
    pub clock: Arc<ManualClock>,
}

/// Create a test app with offline mock dependencies.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    let store = Arc::new(MemoryActivityStore::new());
    let clock = Arc::new(ManualClock::new(WALK_START_MS));
    let state = Arc::new(AppState::new(
        Config::test_default(),
        store.clone(),
        Arc::new(LogNotifier),
        clock.clone(),
    ));

    TestApp {
        router: create_router(state.clone()),
        state,
        store,
        clock,
    }
}

/// Resting accelerometer signal (gravity on z) with a step-shaped bump
/// centered on each index in `step_indices`.
#[allow(dead_code)]
pub fn walking_signal(start_ms: i64, len: usize, step_indices: &[usize]) -> Vec<AccelerometerSample> {
    (0..len)
        .map(|i| {
            let bump = step_indices
                .iter()
                .find_map(|&center| {
                    let offset = i as i64 - center as i64 + 3;
                    (0..7).contains(&offset).then(|| STEP_BUMP[offset as usize])
                })
                .unwrap_or(0.0);
            AccelerometerSample::new(
                start_ms + i as i64 * SAMPLE_INTERVAL_MS,
                0.0,
                0.0,
                9.81 + bump,
            )
        })
        .collect()
}

/// Three fixes walking due north, 0.001 degrees of latitude apart.
#[allow(dead_code)]
pub fn northward_track(start_ms: i64) -> Vec<LocationSample> {
    (0..3)
        .map(|i| LocationSample::new(start_ms + i * 2_500, 37.0 + i as f64 * 0.001, -122.0))
        .collect()
}

/// Send a request to the router, returning the status and JSON body
/// (`Value::Null` for an empty or non-JSON body).
#[allow(dead_code)]
pub async fn send(
    router: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Notifier that counts how often it was told about each transition.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct CountingNotifier {
    started: AtomicUsize,
    stopped: AtomicUsize,
}

#[allow(dead_code)]
impl CountingNotifier {
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn stopped(&self) -> usize {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl ForegroundNotifier for CountingNotifier {
    fn on_recording_started(&self) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn on_recording_stopped(&self) {
        self.stopped.fetch_add(1, Ordering::SeqCst);
    }
}
