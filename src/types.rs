//! Records and request/response shapes shared by the store and the service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::expiration::{expiration_state_at, is_expired_at, ExpirationOption, ExpirationState};
use crate::language::Language;

// ============================================================================
// Stored shapes
// ============================================================================

/// A persisted paste. Holds ciphertext only; the key never reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasteRecord {
    pub id: String,
    /// Wire-encoded envelope, `"<b64 iv>:<b64 ciphertext>"`.
    #[serde(rename = "encrypted_content")]
    pub envelope: String,
    pub language: Language,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl PasteRecord {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        is_expired_at(self.expires_at, now)
    }

    pub fn state_at(&self, now: DateTime<Utc>) -> ExpirationState {
        expiration_state_at(self.expires_at, now)
    }
}

/// Insert request handed to a [`PasteStore`](crate::store::PasteStore).
/// `created_at` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPaste {
    pub id: String,
    pub envelope: String,
    pub language: Language,
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewPaste {
    /// Materialize the record a store persists for this request.
    pub fn into_record(self, created_at: DateTime<Utc>) -> PasteRecord {
        PasteRecord {
            id: self.id,
            envelope: self.envelope,
            language: self.language,
            created_at,
            expires_at: self.expires_at,
        }
    }
}

// ============================================================================
// Service shapes
// ============================================================================

/// Options for [`PasteService::create`](crate::service::PasteService::create).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateOptions {
    /// Overrides classification when set.
    pub language: Option<Language>,
    pub expiration: ExpirationOption,
    /// Used only with [`ExpirationOption::Custom`].
    pub custom_expires_at: Option<DateTime<Utc>>,
    /// Run the formatter over the content before sealing.
    pub format: bool,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            language: None,
            expiration: ExpirationOption::OneDay,
            custom_expires_at: None,
            format: false,
        }
    }
}

/// What the creator gets back. `key` exists nowhere else after this returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPaste {
    pub id: String,
    pub key: String,
    pub language: Language,
    pub expires_at: Option<DateTime<Utc>>,
    pub url: String,
}

/// A decrypted paste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedPaste {
    pub id: String,
    pub content: String,
    pub language: Language,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}
