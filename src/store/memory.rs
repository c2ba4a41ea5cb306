//! In-process paste store. Nothing survives a restart.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use super::traits::{PasteStore, PurgeExpired, StoreError};
use crate::types::{NewPaste, PasteRecord};

/// `HashMap` behind a `parking_lot::Mutex`. The lock is never held across an
/// await point.
#[derive(Default)]
pub struct MemoryPasteStore {
    records: Mutex<HashMap<String, PasteRecord>>,
}

impl MemoryPasteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.lock().contains_key(id)
    }

    /// Insert a record as-is, bypassing `created_at` assignment. Used to seed
    /// fixtures such as already-expired pastes.
    pub fn insert_record(&self, record: PasteRecord) {
        self.records.lock().insert(record.id.clone(), record);
    }
}

#[async_trait]
impl PasteStore for MemoryPasteStore {
    async fn create(&self, paste: NewPaste) -> Result<PasteRecord, StoreError> {
        let mut records = self.records.lock();
        match records.entry(paste.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict(paste.id)),
            Entry::Vacant(slot) => Ok(slot.insert(paste.into_record(Utc::now())).clone()),
        }
    }

    async fn get(&self, id: &str) -> Result<PasteRecord, StoreError> {
        self.records.lock().get(id).cloned().ok_or(StoreError::NotFound)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.records.lock().remove(id);
        Ok(())
    }
}

#[async_trait]
impl PurgeExpired for MemoryPasteStore {
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|_, r| !r.is_expired_at(now));
        Ok(before - records.len())
    }
}
