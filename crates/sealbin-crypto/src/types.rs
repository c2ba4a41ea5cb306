/// AES-GCM IV length in bytes (96 bits per NIST recommendation).
pub const AES_GCM_IV_LENGTH: usize = 12;

/// AES-GCM tag length in bytes (128 bits).
pub const AES_GCM_TAG_LENGTH: usize = 16;

/// AES key length in bytes (256 bits).
pub const AES_KEY_LENGTH: usize = 32;

/// Separator between the iv and ciphertext halves of a wire envelope.
/// Never produced by the standard base64 alphabet.
pub const ENVELOPE_SEPARATOR: char = ':';
