//! Zero-knowledge paste core.
//!
//! Content is sealed with AES-256-GCM under a fresh per-paste key before it
//! reaches a [`store::PasteStore`]; the key travels only in the share link's
//! fragment. This crate covers the paste lifecycle around that: ids, expiry,
//! language detection, formatting, rate limiting, and the [`PasteService`]
//! that ties them together.

pub mod client;
pub mod config;
pub mod error;
pub mod expiration;
pub mod formatter;
pub mod id;
pub mod language;
pub mod link;
pub mod rate_limit;
pub mod reaper;
pub mod service;
pub mod store;
pub mod types;

pub use sealbin_crypto as crypto;

pub use client::client_identifier;
pub use config::{PasteConfig, RateLimitConfig};
pub use error::{PasteError, Result};
pub use expiration::{ExpirationOption, ExpirationState};
pub use formatter::format_code;
pub use id::{generate_id, IdStrategy};
pub use language::{detect_language, Language};
pub use link::ShareLink;
pub use rate_limit::{FixedWindowLimiter, RateLimiter};
pub use reaper::{ExpiryReaper, ReaperHandle};
pub use service::PasteService;
pub use store::{MemoryPasteStore, PasteStore, PurgeExpired, StoreError};
#[cfg(feature = "sqlite")]
pub use store::SqlitePasteStore;
pub use types::{CreateOptions, CreatedPaste, NewPaste, OpenedPaste, PasteRecord};
