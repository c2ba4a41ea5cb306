//! Per-paste symmetric keys.
//!
//! Every paste gets a fresh random 256-bit key. The key leaves the process
//! only as a base64 string in the URL fragment of the share link; it is never
//! handed to storage.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::base64::{base64_decode, base64_encode};
use crate::error::CryptoError;
use crate::types::AES_KEY_LENGTH;

/// A 256-bit AES-GCM key. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PasteKey([u8; AES_KEY_LENGTH]);

impl PasteKey {
    /// Generate a fresh key from the OS CSPRNG.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut key = [0u8; AES_KEY_LENGTH];
        getrandom::getrandom(&mut key).map_err(|e| CryptoError::RngFailed(e.to_string()))?;
        Ok(Self(key))
    }

    /// Wrap raw key bytes. Any 32-byte value is accepted; there is no
    /// strength check beyond length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let key: [u8; AES_KEY_LENGTH] =
            bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
                expected: AES_KEY_LENGTH,
                got: bytes.len(),
            })?;
        Ok(Self(key))
    }

    /// Export as standard base64 for embedding in a URL fragment.
    pub fn export(&self) -> String {
        base64_encode(&self.0)
    }

    /// Import a key previously produced by [`PasteKey::export`].
    pub fn import(encoded: &str) -> Result<Self, CryptoError> {
        let mut bytes = base64_decode(encoded.trim()).map_err(|_| CryptoError::InvalidKeyEncoding)?;
        let key = Self::from_bytes(&bytes);
        bytes.zeroize();
        key
    }

    pub fn as_bytes(&self) -> &[u8; AES_KEY_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for PasteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasteKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_is_32_bytes() {
        let key = PasteKey::generate().unwrap();
        assert_eq!(key.as_bytes().len(), 32);
    }

    #[test]
    fn generate_is_unique() {
        let k1 = PasteKey::generate().unwrap();
        let k2 = PasteKey::generate().unwrap();
        assert_ne!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn export_import_round_trip() {
        let key = PasteKey::generate().unwrap();
        let exported = key.export();
        let imported = PasteKey::import(&exported).unwrap();
        assert_eq!(imported.as_bytes(), key.as_bytes());
    }

    #[test]
    fn export_is_padded_base64() {
        let key = PasteKey::from_bytes(&[0u8; 32]).unwrap();
        assert_eq!(key.export(), "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=");
    }

    #[test]
    fn import_rejects_wrong_length() {
        let short = base64_encode(&[7u8; 16]);
        let err = PasteKey::import(&short).unwrap_err();
        assert_eq!(
            err,
            CryptoError::InvalidKeyLength {
                expected: 32,
                got: 16
            }
        );
        assert!(err.is_invalid_key_format());
    }

    #[test]
    fn import_rejects_bad_encoding() {
        let err = PasteKey::import("%%%not-a-key%%%").unwrap_err();
        assert_eq!(err, CryptoError::InvalidKeyEncoding);
    }

    #[test]
    fn accepts_any_32_bytes() {
        assert!(PasteKey::from_bytes(&[0xff; 32]).is_ok());
    }

    #[test]
    fn debug_hides_material() {
        let key = PasteKey::from_bytes(&[0x41; 32]).unwrap();
        let printed = format!("{:?}", key);
        assert_eq!(printed, "PasteKey(..)");
    }
}
