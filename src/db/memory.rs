// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process store, for offline mode and tests.

use crate::db::{new_record, sort_newest_first, validate_name, ActivityStore, StoreError};
use crate::models::{ActivityRecord, InertialBundle, LocationSample, RecordId, SessionSnapshot};
use dashmap::DashMap;
use futures_util::future::BoxFuture;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

#[derive(Debug, Clone)]
struct StoredWalk {
    record: ActivityRecord,
    locations: Vec<LocationSample>,
    inertial: InertialBundle,
}

/// Store keeping everything in memory.
#[derive(Debug)]
pub struct MemoryActivityStore {
    walks: DashMap<RecordId, StoredWalk>,
    next_id: AtomicU64,
    save_calls: AtomicUsize,
    /// When set, every save fails with an I/O error.
    fail_saves: AtomicBool,
}

impl MemoryActivityStore {
    pub fn new() -> Self {
        Self {
            walks: DashMap::new(),
            next_id: AtomicU64::new(1),
            save_calls: AtomicUsize::new(0),
            fail_saves: AtomicBool::new(false),
        }
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of `save` calls received, successful or not.
    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.walks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walks.is_empty()
    }
}

impl Default for MemoryActivityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityStore for MemoryActivityStore {
    fn save<'a>(
        &'a self,
        name: &'a str,
        snapshot: &'a SessionSnapshot,
    ) -> BoxFuture<'a, Result<RecordId, StoreError>> {
        Box::pin(async move {
            self.save_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(StoreError::Io(std::io::Error::other(
                    "simulated storage failure",
                )));
            }

            let name = validate_name(name)?;
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            let record = new_record(
                id,
                name,
                snapshot,
                format!("memory://{}/gps", id),
                format!("memory://{}/inertial", id),
            );
            self.walks.insert(
                id,
                StoredWalk {
                    record,
                    locations: snapshot.location_samples.clone(),
                    inertial: snapshot.inertial.clone(),
                },
            );
            Ok(id)
        })
    }

    fn get(&self, id: RecordId) -> BoxFuture<'_, Result<Option<ActivityRecord>, StoreError>> {
        Box::pin(async move { Ok(self.walks.get(&id).map(|w| w.record.clone())) })
    }

    fn list(&self) -> BoxFuture<'_, Result<Vec<ActivityRecord>, StoreError>> {
        Box::pin(async move {
            let mut records: Vec<ActivityRecord> =
                self.walks.iter().map(|w| w.record.clone()).collect();
            sort_newest_first(&mut records);
            Ok(records)
        })
    }

    fn rename<'a>(
        &'a self,
        id: RecordId,
        name: &'a str,
    ) -> BoxFuture<'a, Result<ActivityRecord, StoreError>> {
        Box::pin(async move {
            let name = validate_name(name)?;
            let mut walk = self.walks.get_mut(&id).ok_or(StoreError::NotFound(id))?;
            walk.record.name = name.to_string();
            Ok(walk.record.clone())
        })
    }

    fn load_samples(
        &self,
        id: RecordId,
    ) -> BoxFuture<'_, Result<(Vec<LocationSample>, InertialBundle), StoreError>> {
        Box::pin(async move {
            let walk = self.walks.get(&id).ok_or(StoreError::NotFound(id))?;
            Ok((walk.locations.clone(), walk.inertial.clone()))
        })
    }

    fn delete(&self, id: RecordId) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(async move {
            self.walks
                .remove(&id)
                .map(|_| ())
                .ok_or(StoreError::NotFound(id))
        })
    }

    fn delete_all(&self) -> BoxFuture<'_, Result<usize, StoreError>> {
        Box::pin(async move {
            let removed = self.walks.len();
            self.walks.clear();
            Ok(removed)
        })
    }
}
