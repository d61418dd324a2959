// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persisted walk record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque identifier assigned by the store.
pub type RecordId = u64;

/// Stored walk metadata.
///
/// The raw samples live in separate payloads referenced by
/// `location_payload` and `inertial_payload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: RecordId,
    /// User-chosen name for the walk
    pub name: String,
    /// When recording started
    pub start_date: DateTime<Utc>,
    /// Hardware step detector count
    pub step_count: u32,
    pub elapsed_time_ms: i64,
    pub distance_meters: f64,
    /// Pointer to the serialized location samples
    pub location_payload: String,
    /// Pointer to the serialized inertial bundle
    pub inertial_payload: String,
}
