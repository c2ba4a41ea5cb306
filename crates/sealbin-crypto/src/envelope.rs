//! Wire envelope for stored pastes.
//!
//! Format: `"<base64 iv>:<base64 ciphertext+tag>"`. Standard base64 never
//! contains `:`, so a single separator splits the two halves unambiguously.

use crate::aes_gcm::{self, Sealed};
use crate::base64::{base64_decode, base64_encode};
use crate::error::CryptoError;
use crate::key::PasteKey;
use crate::types::{AES_GCM_IV_LENGTH, ENVELOPE_SEPARATOR};

/// Join an already-encoded IV and ciphertext into wire form.
pub fn combine(iv: &str, ciphertext: &str) -> String {
    let mut out = String::with_capacity(iv.len() + 1 + ciphertext.len());
    out.push_str(iv);
    out.push(ENVELOPE_SEPARATOR);
    out.push_str(ciphertext);
    out
}

/// Split wire form back into `(iv, ciphertext)`, both still encoded.
pub fn split(combined: &str) -> Result<(&str, &str), CryptoError> {
    let (iv, ciphertext) = combined
        .split_once(ENVELOPE_SEPARATOR)
        .ok_or(CryptoError::MalformedEnvelope("missing separator"))?;
    if iv.is_empty() || ciphertext.is_empty() {
        return Err(CryptoError::MalformedEnvelope("empty component"));
    }
    if ciphertext.contains(ENVELOPE_SEPARATOR) {
        return Err(CryptoError::MalformedEnvelope("more than one separator"));
    }
    Ok((iv, ciphertext))
}

/// Decoded envelope: raw IV bytes plus ciphertext with tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub iv: [u8; AES_GCM_IV_LENGTH],
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Encrypt `plaintext` under `key` into a new envelope.
    pub fn seal(plaintext: &[u8], key: &PasteKey) -> Result<Self, CryptoError> {
        let Sealed { iv, ciphertext } = aes_gcm::encrypt(plaintext, key)?;
        Ok(Self { iv, ciphertext })
    }

    /// Authenticate and decrypt.
    pub fn open(&self, key: &PasteKey) -> Result<Vec<u8>, CryptoError> {
        aes_gcm::decrypt(&self.ciphertext, &self.iv, key)
    }

    pub fn to_wire(&self) -> String {
        combine(&base64_encode(&self.iv), &base64_encode(&self.ciphertext))
    }

    /// Parse wire form. Bad base64 or an IV of the wrong size is reported as
    /// a malformed envelope rather than a decryption failure.
    pub fn from_wire(wire: &str) -> Result<Self, CryptoError> {
        let (iv_b64, ct_b64) = split(wire)?;
        let iv_bytes =
            base64_decode(iv_b64).map_err(|_| CryptoError::MalformedEnvelope("iv is not base64"))?;
        let iv: [u8; AES_GCM_IV_LENGTH] = iv_bytes
            .as_slice()
            .try_into()
            .map_err(|_| CryptoError::MalformedEnvelope("iv has wrong length"))?;
        let ciphertext = base64_decode(ct_b64)
            .map_err(|_| CryptoError::MalformedEnvelope("ciphertext is not base64"))?;
        Ok(Self { iv, ciphertext })
    }
}
