// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recording session control.
//!
//! Requests that do not fit the current state succeed with
//! `applied: false` and the state the session was in.

use crate::error::Result;
use crate::models::{CapabilityReport, RecordId, SessionState, SessionStatus, Transition};
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/session", get(get_status))
        .route("/api/session/start", post(start))
        .route("/api/session/stop", post(stop))
        .route("/api/session/save", post(save))
        .route("/api/session/cancel", post(cancel))
}

/// Outcome of a session transition request.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TransitionResponse {
    pub applied: bool,
    /// State after the request
    pub state: SessionState,
    /// Set when a walk was saved
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub record_id: Option<RecordId>,
    /// Current session status, including the stopped walk's summary
    pub status: SessionStatus,
}

impl TransitionResponse {
    async fn after<T>(state: &AppState, transition: &Transition<T>, outcome: SessionState) -> Self {
        let status = state.session.status().await;
        let (applied, reported) = match transition {
            Transition::Applied(_) => (true, outcome),
            Transition::Ignored(_) => (false, status.state),
        };
        Self {
            applied,
            state: reported,
            record_id: None,
            status,
        }
    }
}

async fn get_status(State(state): State<Arc<AppState>>) -> Json<SessionStatus> {
    Json(state.session.status().await)
}

/// Start recording. The body reports which capabilities the device holds.
async fn start(
    State(state): State<Arc<AppState>>,
    Json(capabilities): Json<CapabilityReport>,
) -> Result<Json<TransitionResponse>> {
    let transition = state.session.start(&capabilities).await?;
    Ok(Json(
        TransitionResponse::after(&state, &transition, SessionState::Recording).await,
    ))
}

async fn stop(State(state): State<Arc<AppState>>) -> Json<TransitionResponse> {
    let transition = state.session.stop().await;
    Json(TransitionResponse::after(&state, &transition, SessionState::Stopped).await)
}

#[derive(Deserialize)]
struct SaveRequest {
    name: String,
}

/// Save the stopped walk under a name.
async fn save(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SaveRequest>,
) -> Result<Json<TransitionResponse>> {
    let transition = state.session.save(&request.name).await?;
    let mut response = TransitionResponse::after(&state, &transition, SessionState::Saved).await;
    response.record_id = transition.applied();
    Ok(Json(response))
}

async fn cancel(State(state): State<Arc<AppState>>) -> Result<Json<TransitionResponse>> {
    let transition = state.session.cancel().await?;
    Ok(Json(
        TransitionResponse::after(&state, &transition, SessionState::Cancelled).await,
    ))
}
