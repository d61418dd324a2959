// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Stored walk catalogue.

use crate::error::{AppError, Result};
use crate::models::{ActivityRecord, RecordId};
use crate::services::{activity_details, ActivityDetails};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/activities",
            get(get_activities).delete(delete_all_activities),
        )
        .route(
            "/api/activities/{id}",
            get(get_activity)
                .patch(rename_activity)
                .delete(delete_activity),
        )
}

#[derive(Deserialize)]
struct ActivitiesQuery {
    /// Only walks starting at or after this time (RFC3339)
    after: Option<String>,
    /// Only walks starting at or before this time (RFC3339)
    before: Option<String>,
}

fn parse_timestamp(name: &str, raw: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    raw.map(|raw| {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| {
                AppError::BadRequest(format!(
                    "Invalid '{}' parameter: must be RFC3339 datetime",
                    name
                ))
            })
    })
    .transpose()
}

#[derive(Serialize, Clone, Debug)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivitySummary {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: RecordId,
    pub name: String,
    pub start_date: String,
    pub steps: u32,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub elapsed_time_ms: i64,
    pub distance_meters: f64,
}

impl From<ActivityRecord> for ActivitySummary {
    fn from(record: ActivityRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            start_date: format_utc_rfc3339(record.start_date),
            steps: record.step_count,
            elapsed_time_ms: record.elapsed_time_ms,
            distance_meters: record.distance_meters,
        }
    }
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivitiesResponse {
    /// Newest first
    pub activities: Vec<ActivitySummary>,
    pub total: u32,
}

/// List stored walks, optionally restricted to a date range.
async fn get_activities(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ActivitiesQuery>,
) -> Result<Json<ActivitiesResponse>> {
    tracing::debug!(after = ?params.after, before = ?params.before, "Fetching activities");

    let after = parse_timestamp("after", params.after.as_deref())?;
    let before = parse_timestamp("before", params.before.as_deref())?;

    let records = match (after, before) {
        (None, None) => state.store.list().await?,
        (after, before) => {
            let start = after.unwrap_or(DateTime::<Utc>::MIN_UTC);
            let end = before.unwrap_or(DateTime::<Utc>::MAX_UTC);
            if start > end {
                return Err(AppError::BadRequest(
                    "'after' must not be later than 'before'".to_string(),
                ));
            }
            state.store.list_between(start, end).await?
        }
    };

    let activities: Vec<ActivitySummary> = records.into_iter().map(Into::into).collect();
    Ok(Json(ActivitiesResponse {
        total: activities.len() as u32,
        activities,
    }))
}

/// Details of one walk, including the calculated step count and route.
async fn get_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<Json<ActivityDetails>> {
    let details = activity_details(
        state.store.as_ref(),
        id,
        &state.config.step_detector,
    )
    .await?;
    Ok(Json(details))
}

#[derive(Deserialize)]
struct RenameRequest {
    name: String,
}

async fn rename_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
    Json(request): Json<RenameRequest>,
) -> Result<Json<ActivitySummary>> {
    let record = state.store.rename(id, &request.name).await?;
    tracing::info!(record_id = id, "Walk renamed");
    Ok(Json(record.into()))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DeleteResponse {
    pub deleted: u32,
}

async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Path(id): Path<RecordId>,
) -> Result<Json<DeleteResponse>> {
    state.store.delete(id).await?;
    Ok(Json(DeleteResponse { deleted: 1 }))
}

async fn delete_all_activities(State(state): State<Arc<AppState>>) -> Result<Json<DeleteResponse>> {
    let deleted = state.store.delete_all().await?;
    Ok(Json(DeleteResponse {
        deleted: deleted as u32,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("after", None).unwrap(), None);

        let parsed = parse_timestamp("after", Some("2024-05-01T10:00:00+02:00"))
            .unwrap()
            .unwrap();
        assert_eq!(format_utc_rfc3339(parsed), "2024-05-01T08:00:00Z");

        assert!(matches!(
            parse_timestamp("before", Some("yesterday")),
            Err(AppError::BadRequest(msg)) if msg.contains("'before'")
        ));
    }
}
