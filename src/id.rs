//! Paste identifier generation.
//!
//! Ids are 10 base62 symbols drawn from the OS CSPRNG (62^10 ≈ 8.4e17
//! combinations). Uniqueness is not guaranteed here; the service retries on
//! a store conflict.

use serde::{Deserialize, Serialize};

use crate::error::{PasteError, Result};

/// Base62 alphabet in the order ids are mapped onto.
pub const ID_ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Number of symbols in a paste id.
pub const ID_LENGTH: usize = 10;

/// Largest multiple of 62 that fits in a byte. Bytes at or above this are
/// discarded by the unbiased strategy.
const REJECTION_BOUND: u8 = 248;

/// How random bytes are reduced onto the alphabet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// `byte % 62`. Symbols 0..8 are slightly more likely (5/256 vs 4/256).
    #[default]
    Modulo,
    /// Rejection sampling; uniform over the alphabet.
    Unbiased,
}

/// Generate an id with the given strategy.
pub fn generate_id_with(strategy: IdStrategy) -> Result<String> {
    match strategy {
        IdStrategy::Modulo => generate_id(),
        IdStrategy::Unbiased => generate_unbiased_id(),
    }
}

/// Generate an id by mapping each of 10 random bytes through `byte % 62`.
pub fn generate_id() -> Result<String> {
    let mut bytes = [0u8; ID_LENGTH];
    fill_random(&mut bytes)?;
    Ok(bytes
        .iter()
        .map(|b| ID_ALPHABET[(*b as usize) % ID_ALPHABET.len()] as char)
        .collect())
}

/// Generate an id with no modulo bias.
pub fn generate_unbiased_id() -> Result<String> {
    let mut id = String::with_capacity(ID_LENGTH);
    let mut buf = [0u8; ID_LENGTH * 2];
    while id.len() < ID_LENGTH {
        fill_random(&mut buf)?;
        for b in buf.iter().filter(|b| **b < REJECTION_BOUND) {
            if id.len() == ID_LENGTH {
                break;
            }
            id.push(ID_ALPHABET[(*b as usize) % ID_ALPHABET.len()] as char);
        }
    }
    Ok(id)
}

/// True if `id` has the shape of a generated id.
pub fn is_valid_id(id: &str) -> bool {
    id.len() == ID_LENGTH && id.bytes().all(|b| b.is_ascii_alphanumeric())
}

fn fill_random(buf: &mut [u8]) -> Result<()> {
    getrandom::getrandom(buf).map_err(|e| PasteError::Crypto(e.to_string()))
}
