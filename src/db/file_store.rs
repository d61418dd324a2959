// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Directory-backed store.
//!
//! Layout:
//! - `records.json`: the record index (all metadata)
//! - `walk_{id}_gps.json`: location samples of one walk
//! - `walk_{id}_inertial.json`: inertial bundle of one walk
//!
//! Payloads are written before the index entry, so the index never points
//! at a payload that was not written. Index writes go through a temporary
//! file and a rename.

use crate::db::{files, new_record, sort_newest_first, validate_name, ActivityStore, StoreError};
use crate::models::{ActivityRecord, InertialBundle, LocationSample, RecordId, SessionSnapshot};
use dashmap::DashMap;
use futures_util::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;

/// Store writing JSON files into a single directory.
#[derive(Debug)]
pub struct FileActivityStore {
    dir: PathBuf,
    index: DashMap<RecordId, ActivityRecord>,
    next_id: AtomicU64,
    /// Serializes index file rewrites
    index_lock: tokio::sync::Mutex<()>,
}

impl FileActivityStore {
    /// Open (or create) a store rooted at `dir`.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).await?;

        let records: Vec<ActivityRecord> = match fs::read(dir.join(files::RECORDS)).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        let next_id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let index = DashMap::new();
        for record in records {
            index.insert(record.id, record);
        }

        tracing::info!(
            dir = %dir.display(),
            records = index.len(),
            "Opened activity store"
        );

        Ok(Self {
            dir,
            index,
            next_id: AtomicU64::new(next_id),
            index_lock: tokio::sync::Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Rewrite the index file from the in-memory index.
    async fn persist_index(&self) -> Result<(), StoreError> {
        let _guard = self.index_lock.lock().await;

        let mut records: Vec<ActivityRecord> =
            self.index.iter().map(|r| r.value().clone()).collect();
        records.sort_by_key(|r| r.id);

        let tmp = self.path(&format!("{}.tmp", files::RECORDS));
        write_json(&tmp, &records).await?;
        fs::rename(&tmp, self.path(files::RECORDS)).await?;
        Ok(())
    }

    async fn write_payloads(
        &self,
        record: &ActivityRecord,
        snapshot: &SessionSnapshot,
    ) -> Result<(), StoreError> {
        write_json(
            &self.path(&record.location_payload),
            &snapshot.location_samples,
        )
        .await?;
        write_json(&self.path(&record.inertial_payload), &snapshot.inertial).await?;
        Ok(())
    }

    async fn remove_payloads(&self, record: &ActivityRecord) -> Result<(), StoreError> {
        remove_if_exists(&self.path(&record.location_payload)).await?;
        remove_if_exists(&self.path(&record.inertial_payload)).await?;
        Ok(())
    }

    /// Best-effort removal of the payloads of a walk that was not saved.
    async fn discard_payloads(&self, record: &ActivityRecord) {
        if let Err(e) = self.remove_payloads(record).await {
            tracing::warn!(record_id = record.id, error = %e, "Failed to clean up walk payloads");
        }
    }

    async fn save_inner(
        &self,
        name: &str,
        snapshot: &SessionSnapshot,
    ) -> Result<RecordId, StoreError> {
        let name = validate_name(name)?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = new_record(
            id,
            name,
            snapshot,
            files::location_payload(id),
            files::inertial_payload(id),
        );

        if let Err(e) = self.write_payloads(&record, snapshot).await {
            self.discard_payloads(&record).await;
            return Err(e);
        }

        self.index.insert(id, record.clone());
        if let Err(e) = self.persist_index().await {
            self.index.remove(&id);
            self.discard_payloads(&record).await;
            return Err(e);
        }

        tracing::info!(
            record_id = id,
            locations = snapshot.location_samples.len(),
            accelerometer = snapshot.inertial.accelerometer.len(),
            "Walk saved"
        );
        Ok(id)
    }
}

impl ActivityStore for FileActivityStore {
    fn save<'a>(
        &'a self,
        name: &'a str,
        snapshot: &'a SessionSnapshot,
    ) -> BoxFuture<'a, Result<RecordId, StoreError>> {
        Box::pin(self.save_inner(name, snapshot))
    }

    fn get(&self, id: RecordId) -> BoxFuture<'_, Result<Option<ActivityRecord>, StoreError>> {
        Box::pin(async move { Ok(self.index.get(&id).map(|r| r.value().clone())) })
    }

    fn list(&self) -> BoxFuture<'_, Result<Vec<ActivityRecord>, StoreError>> {
        Box::pin(async move {
            let mut records: Vec<ActivityRecord> =
                self.index.iter().map(|r| r.value().clone()).collect();
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
            let (updated, previous) = {
                let mut entry = self.index.get_mut(&id).ok_or(StoreError::NotFound(id))?;
                let previous = std::mem::replace(&mut entry.name, name.to_string());
                (entry.value().clone(), previous)
            };

            if let Err(e) = self.persist_index().await {
                if let Some(mut entry) = self.index.get_mut(&id) {
                    entry.name = previous;
                }
                return Err(e);
            }
            Ok(updated)
        })
    }

    fn load_samples(
        &self,
        id: RecordId,
    ) -> BoxFuture<'_, Result<(Vec<LocationSample>, InertialBundle), StoreError>> {
        Box::pin(async move {
            let record = self
                .index
                .get(&id)
                .map(|r| r.value().clone())
                .ok_or(StoreError::NotFound(id))?;

            let locations = read_json(&self.path(&record.location_payload)).await?;
            let inertial = read_json(&self.path(&record.inertial_payload)).await?;
            Ok((locations, inertial))
        })
    }

    fn delete(&self, id: RecordId) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(async move {
            let (_, record) = self.index.remove(&id).ok_or(StoreError::NotFound(id))?;

            if let Err(e) = self.persist_index().await {
                self.index.insert(id, record);
                return Err(e);
            }
            // The record is gone from the index; leftover payloads are only garbage
            if let Err(e) = self.remove_payloads(&record).await {
                tracing::warn!(record_id = id, error = %e, "Failed to remove walk payloads");
            }

            tracing::info!(record_id = id, "Walk deleted");
            Ok(())
        })
    }

    fn delete_all(&self) -> BoxFuture<'_, Result<usize, StoreError>> {
        Box::pin(async move {
            let records: Vec<ActivityRecord> =
                self.index.iter().map(|r| r.value().clone()).collect();
            self.index.clear();
            if let Err(e) = self.persist_index().await {
                for record in records {
                    self.index.insert(record.id, record);
                }
                return Err(e);
            }

            for record in &records {
                if let Err(e) = self.remove_payloads(record).await {
                    tracing::warn!(record_id = record.id, error = %e, "Failed to remove walk payloads");
                }
            }

            tracing::info!(count = records.len(), "All walks deleted");
            Ok(records.len())
        })
    }
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec(value)?;
    fs::write(path, bytes).await?;
    Ok(())
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let bytes = fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

async fn remove_if_exists(path: &Path) -> Result<(), StoreError> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
