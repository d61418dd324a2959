// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::db::StoreError;
use crate::models::Capability;
use crate::services::{DetailsError, SessionError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing required capabilities: {0:?}")]
    CapabilityRequired(Vec<Capability>),

    #[error("Required capabilities were denied: {0:?}")]
    CapabilityDenied(Vec<Capability>),

    #[error("Walk name must not be blank")]
    InvalidName,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Saving the stopped walk failed; the walk is kept and save may be retried
    #[error("Failed to save walk: {0}")]
    PersistFailed(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

fn capability_list(capabilities: &[Capability]) -> String {
    capabilities
        .iter()
        .map(Capability::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::CapabilityRequired(caps) => (
                StatusCode::FORBIDDEN,
                "capability_required",
                Some(capability_list(caps)),
            ),
            AppError::CapabilityDenied(caps) => (
                StatusCode::FORBIDDEN,
                "capability_denied",
                Some(capability_list(caps)),
            ),
            AppError::InvalidName => (StatusCode::BAD_REQUEST, "invalid_name", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::PersistFailed(msg) => {
                tracing::error!(error = %msg, "Failed to persist walk");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "persist_failed",
                    Some(msg.clone()),
                )
            }
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::CapabilityRequired(caps) => AppError::CapabilityRequired(caps),
            SessionError::CapabilityDenied(caps) => AppError::CapabilityDenied(caps),
            SessionError::InvalidName => AppError::InvalidName,
            SessionError::PersistFailed(e) => AppError::PersistFailed(e.to_string()),
            SessionError::Aggregator(e) => AppError::Internal(e.into()),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => AppError::NotFound(format!("activity {}", id)),
            StoreError::InvalidName => AppError::InvalidName,
            other => AppError::Storage(other.to_string()),
        }
    }
}

impl From<DetailsError> for AppError {
    fn from(err: DetailsError) -> Self {
        match err {
            DetailsError::Store(e) => e.into(),
            DetailsError::Route(msg) => AppError::Internal(anyhow::anyhow!("Route error: {}", msg)),
        }
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
