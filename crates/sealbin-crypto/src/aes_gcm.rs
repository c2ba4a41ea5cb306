//! AES-256-GCM encryption for paste content.
//!
//! Output is kept as two parts, the 12-byte IV and `ciphertext || tag`, so
//! the envelope layer can encode them separately.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};

use crate::error::CryptoError;
use crate::key::PasteKey;
use crate::types::{AES_GCM_IV_LENGTH, AES_GCM_TAG_LENGTH};

/// Result of a single encryption: a fresh IV and the authenticated ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub iv: [u8; AES_GCM_IV_LENGTH],
    /// Ciphertext with the 16-byte tag appended.
    pub ciphertext: Vec<u8>,
}

/// Generate a random 12-byte IV for AES-GCM.
pub fn generate_iv() -> Result<[u8; AES_GCM_IV_LENGTH], CryptoError> {
    let mut iv = [0u8; AES_GCM_IV_LENGTH];
    getrandom::getrandom(&mut iv).map_err(|e| CryptoError::RngFailed(e.to_string()))?;
    Ok(iv)
}

/// Encrypt `plaintext` under `key` with a newly drawn IV.
///
/// The IV is sampled from the OS CSPRNG on every call and never reused by this
/// function. 96 random bits keep the collision probability negligible for the
/// one-key-per-paste usage here.
pub fn encrypt(plaintext: &[u8], key: &PasteKey) -> Result<Sealed, CryptoError> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
    let iv = generate_iv()?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&iv), plaintext)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
    Ok(Sealed { iv, ciphertext })
}

/// Decrypt `ciphertext || tag` with the given IV and key.
///
/// Every failure, including a malformed IV or truncated input, collapses to
/// [`CryptoError::DecryptionFailed`].
pub fn decrypt(ciphertext: &[u8], iv: &[u8], key: &PasteKey) -> Result<Vec<u8>, CryptoError> {
    if iv.len() != AES_GCM_IV_LENGTH || ciphertext.len() < AES_GCM_TAG_LENGTH {
        return Err(CryptoError::DecryptionFailed);
    }
    let cipher =
        Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| CryptoError::DecryptionFailed)?;
    cipher
        .decrypt(Nonce::from_slice(iv), ciphertext)
        .map_err(|_| CryptoError::DecryptionFailed)
}
