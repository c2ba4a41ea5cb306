//! Persistence seam: the narrow interface the paste core talks to.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::{NewPaste, PasteRecord};

/// Failures a store can report.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The id is already taken. Callers may retry with a fresh id.
    #[error("id already exists: {0}")]
    Conflict(String),

    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Backend(String),
}

// ============================================================================
// PasteStore
// ============================================================================

/// Durable key-value persistence for sealed pastes.
///
/// Each call is atomic for its key. The store never sees keys or plaintext.
#[async_trait]
pub trait PasteStore: Send + Sync {
    /// Insert a new paste. An existing id is [`StoreError::Conflict`], never
    /// an overwrite.
    async fn create(&self, paste: NewPaste) -> Result<PasteRecord, StoreError>;

    async fn get(&self, id: &str) -> Result<PasteRecord, StoreError>;

    /// Remove a paste. Deleting an absent id succeeds.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Bulk removal of expired pastes, used by [`crate::reaper::ExpiryReaper`].
#[async_trait]
pub trait PurgeExpired: Send + Sync {
    /// Delete every paste whose expiry lies strictly before `now`. Returns how
    /// many were removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError>;
}

#[async_trait]
impl<S: PasteStore + ?Sized> PasteStore for Arc<S> {
    async fn create(&self, paste: NewPaste) -> Result<PasteRecord, StoreError> {
        (**self).create(paste).await
    }

    async fn get(&self, id: &str) -> Result<PasteRecord, StoreError> {
        (**self).get(id).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        (**self).delete(id).await
    }
}

#[async_trait]
impl<S: PurgeExpired + ?Sized> PurgeExpired for Arc<S> {
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        (**self).purge_expired(now).await
    }
}
