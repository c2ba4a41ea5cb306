use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Invalid key format: expected {expected} bytes, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("Invalid key format: not valid base64")]
    InvalidKeyEncoding,

    /// Tag verification failed. Deliberately carries no detail: a wrong key
    /// and tampered ciphertext must be indistinguishable to the caller.
    #[error("Failed to decrypt content. Invalid key or corrupted data.")]
    DecryptionFailed,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(&'static str),

    #[error("Random number generation failed: {0}")]
    RngFailed(String),
}

impl CryptoError {
    /// True for either flavour of key import failure.
    pub fn is_invalid_key_format(&self) -> bool {
        matches!(
            self,
            CryptoError::InvalidKeyLength { .. } | CryptoError::InvalidKeyEncoding
        )
    }
}
