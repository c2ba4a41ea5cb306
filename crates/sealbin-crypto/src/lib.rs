pub mod aes_gcm;
pub mod base64;
pub mod envelope;
pub mod error;
pub mod key;
pub mod types;

pub use aes_gcm::{decrypt, encrypt, generate_iv, Sealed};
pub use base64::{base64_decode, base64_encode};
pub use envelope::{combine, split, Envelope};
pub use error::CryptoError;
pub use key::PasteKey;
pub use types::{AES_GCM_IV_LENGTH, AES_GCM_TAG_LENGTH, AES_KEY_LENGTH, ENVELOPE_SEPARATOR};
