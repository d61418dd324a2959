//! Persistence layer for finished walks.
//!
//! The session only depends on the [`ActivityStore`] trait; `main` decides
//! which implementation to inject.

pub mod file_store;
pub mod memory;

pub use file_store::FileActivityStore;
pub use memory::MemoryActivityStore;

use crate::models::{ActivityRecord, InertialBundle, LocationSample, RecordId, SessionSnapshot};
use crate::time_utils::millis_to_utc;
use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;

/// File names used by the directory-backed store.
pub mod files {
    /// Record index
    pub const RECORDS: &str = "records.json";

    pub fn location_payload(id: super::RecordId) -> String {
        format!("walk_{}_gps.json", id)
    }

    pub fn inertial_payload(id: super::RecordId) -> String {
        format!("walk_{}_inertial.json", id)
    }
}

/// Storage for finished walks and their raw samples.
///
/// Every call is attempted once; retry policy belongs to the caller.
pub trait ActivityStore: Send + Sync {
    /// Persist a stopped walk under `name`, returning the new record ID.
    fn save<'a>(
        &'a self,
        name: &'a str,
        snapshot: &'a SessionSnapshot,
    ) -> BoxFuture<'a, Result<RecordId, StoreError>>;

    fn get(&self, id: RecordId) -> BoxFuture<'_, Result<Option<ActivityRecord>, StoreError>>;

    /// All records, newest start date first.
    fn list(&self) -> BoxFuture<'_, Result<Vec<ActivityRecord>, StoreError>>;

    /// Records whose start date falls in `[start, end]`, newest first.
    fn list_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Result<Vec<ActivityRecord>, StoreError>> {
        Box::pin(async move {
            let records = self.list().await?;
            Ok(records
                .into_iter()
                .filter(|r| r.start_date >= start && r.start_date <= end)
                .collect())
        })
    }

    /// Change the name of a stored walk.
    fn rename<'a>(
        &'a self,
        id: RecordId,
        name: &'a str,
    ) -> BoxFuture<'a, Result<ActivityRecord, StoreError>>;

    /// Load the raw samples of a stored walk.
    fn load_samples(
        &self,
        id: RecordId,
    ) -> BoxFuture<'_, Result<(Vec<LocationSample>, InertialBundle), StoreError>>;

    /// Remove a record together with its payloads.
    fn delete(&self, id: RecordId) -> BoxFuture<'_, Result<(), StoreError>>;

    /// Remove every record. Returns how many were removed.
    fn delete_all(&self) -> BoxFuture<'_, Result<usize, StoreError>>;
}

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(RecordId),

    #[error("Record name must not be blank")]
    InvalidName,

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode or decode stored data: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Build the metadata record for a freshly saved walk.
pub(crate) fn new_record(
    id: RecordId,
    name: &str,
    snapshot: &SessionSnapshot,
    location_payload: String,
    inertial_payload: String,
) -> ActivityRecord {
    ActivityRecord {
        id,
        name: name.to_string(),
        start_date: millis_to_utc(snapshot.start_time_ms),
        step_count: snapshot.hardware_step_count,
        elapsed_time_ms: snapshot.elapsed_time_ms,
        distance_meters: snapshot.distance_meters,
        location_payload,
        inertial_payload,
    }
}

/// Trim a record name, rejecting blank ones.
pub(crate) fn validate_name(name: &str) -> Result<&str, StoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(StoreError::InvalidName)
    } else {
        Ok(trimmed)
    }
}

/// Newest first; ties broken by descending ID so the order is stable.
pub(crate) fn sort_newest_first(records: &mut [ActivityRecord]) {
    records.sort_by(|a, b| {
        b.start_date
            .cmp(&a.start_date)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  Evening walk ").unwrap(), "Evening walk");
        assert!(matches!(validate_name("   "), Err(StoreError::InvalidName)));
        assert!(matches!(validate_name(""), Err(StoreError::InvalidName)));
    }

    #[test]
    fn test_payload_file_names() {
        assert_eq!(files::location_payload(7), "walk_7_gps.json");
        assert_eq!(files::inertial_payload(7), "walk_7_inertial.json");
    }
}
