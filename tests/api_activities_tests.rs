// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stored walk catalogue over HTTP.

use axum::http::StatusCode;
use serde_json::json;
use walk_tracker::db::ActivityStore;
use walk_tracker::models::{InertialBundle, RecordId, SessionSnapshot};

mod common;

use common::{create_test_app, northward_track, send, walking_signal, TestApp, WALK_START_MS};

const DAY_MS: i64 = 86_400_000;

async fn seed(app: &TestApp, name: &str, start_time_ms: i64) -> RecordId {
    let snapshot = SessionSnapshot {
        elapsed_time_ms: 5_000,
        hardware_step_count: 3,
        location_samples: northward_track(start_time_ms),
        inertial: InertialBundle {
            accelerometer: walking_signal(start_time_ms, 251, &[100, 160]),
            ..Default::default()
        },
        start_time_ms,
        distance_meters: 222.39,
    };
    app.state.store.save(name, &snapshot).await.unwrap()
}

#[tokio::test]
async fn test_list_newest_first() {
    let app = create_test_app();
    seed(&app, "Monday", WALK_START_MS).await;
    seed(&app, "Wednesday", WALK_START_MS + 2 * DAY_MS).await;
    seed(&app, "Tuesday", WALK_START_MS + DAY_MS).await;

    let (status, body) = send(&app.router, "GET", "/api/activities", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);

    let names: Vec<&str> = body["activities"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Wednesday", "Tuesday", "Monday"]);
    assert_eq!(body["activities"][2]["start_date"], "2024-05-01T08:00:00Z");
}

#[tokio::test]
async fn test_list_date_range() {
    let app = create_test_app();
    seed(&app, "Monday", WALK_START_MS).await;
    seed(&app, "Tuesday", WALK_START_MS + DAY_MS).await;
    seed(&app, "Wednesday", WALK_START_MS + 2 * DAY_MS).await;

    let (status, body) = send(
        &app.router,
        "GET",
        "/api/activities?after=2024-05-02T00:00:00Z&before=2024-05-02T23:59:59Z",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["activities"][0]["name"], "Tuesday");

    let (_, body) = send(
        &app.router,
        "GET",
        "/api/activities?after=2024-05-02T00:00:00Z",
        None,
    )
    .await;
    assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn test_invalid_date_format() {
    let app = create_test_app();
    let (status, body) = send(&app.router, "GET", "/api/activities?after=last-week", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_inverted_date_range() {
    let app = create_test_app();
    let (status, _) = send(
        &app.router,
        "GET",
        "/api/activities?after=2024-06-01T00:00:00Z&before=2024-05-01T00:00:00Z",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_activity_details() {
    let app = create_test_app();
    let id = seed(&app, "Park loop", WALK_START_MS).await;

    let (status, body) = send(&app.router, "GET", &format!("/api/activities/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Park loop");
    assert_eq!(body["steps"], 3);
    assert_eq!(body["calculated_steps"], 2);
    assert_eq!(body["elapsed_time_ms"], 5_000);
    assert_eq!(body["location_count"], 3);
    assert!(!body["route_polyline"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_activity_is_not_found() {
    let app = create_test_app();
    let (status, body) = send(&app.router, "GET", "/api/activities/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = send(&app.router, "DELETE", "/api/activities/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rename_activity() {
    let app = create_test_app();
    let id = seed(&app, "Walk", WALK_START_MS).await;
    let uri = format!("/api/activities/{}", id);

    let (status, body) = send(
        &app.router,
        "PATCH",
        &uri,
        Some(json!({ "name": "Ridge trail" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ridge trail");

    let (status, body) = send(&app.router, "PATCH", &uri, Some(json!({ "name": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_name");
}

#[tokio::test]
async fn test_delete_activity() {
    let app = create_test_app();
    let keep = seed(&app, "Keep", WALK_START_MS).await;
    let gone = seed(&app, "Drop", WALK_START_MS + DAY_MS).await;

    let (status, body) = send(
        &app.router,
        "DELETE",
        &format!("/api/activities/{}", gone),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], 1);

    assert!(app.store.get(gone).await.unwrap().is_none());
    assert!(app.store.get(keep).await.unwrap().is_some());

    let (_, body) = send(&app.router, "DELETE", "/api/activities", None).await;
    assert_eq!(body["deleted"], 1);
    assert!(app.store.is_empty());
}
