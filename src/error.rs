//! Error types for the paste core.

use sealbin_crypto::CryptoError;
use thiserror::Error;

use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, PasteError>;

/// Every failure the core can surface to its caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasteError {
    /// Empty content, an oversized envelope, or an unparseable option.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid key format")]
    InvalidKeyFormat,

    /// Authentication tag did not verify. Wrong key and tampered data are
    /// reported identically.
    #[error("Failed to decrypt content. Invalid key or corrupted data.")]
    DecryptionFailure,

    #[error("Invalid encrypted data format: {0}")]
    MalformedEnvelope(&'static str),

    #[error("Paste not found")]
    NotFound,

    #[error("Paste has expired")]
    Expired,

    #[error("Paste id already exists: {0}")]
    Conflict(String),

    #[error("Store error: {0}")]
    Store(String),

    /// RNG or cipher initialisation failure. Never produced by bad input.
    #[error("Crypto backend error: {0}")]
    Crypto(String),

    #[error("Too many requests")]
    RateLimited,

    /// The share link carried no key fragment. Distinct from a missing paste.
    #[error("Encryption key is missing from URL")]
    MissingKey,
}

impl From<CryptoError> for PasteError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::InvalidKeyLength { .. } | CryptoError::InvalidKeyEncoding => {
                PasteError::InvalidKeyFormat
            }
            CryptoError::DecryptionFailed => PasteError::DecryptionFailure,
            CryptoError::MalformedEnvelope(reason) => PasteError::MalformedEnvelope(reason),
            CryptoError::EncryptionFailed(msg) | CryptoError::RngFailed(msg) => {
                PasteError::Crypto(msg)
            }
        }
    }
}

impl From<StoreError> for PasteError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => PasteError::NotFound,
            StoreError::Conflict(id) => PasteError::Conflict(id),
            StoreError::Backend(msg) => PasteError::Store(msg),
        }
    }
}
