//! Service configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{PasteError, Result};
use crate::id::IdStrategy;
use crate::rate_limit::{DEFAULT_CLEANUP_PROBABILITY, DEFAULT_LIMIT, DEFAULT_WINDOW};

/// Largest accepted wire envelope, in bytes.
pub const DEFAULT_MAX_ENVELOPE_BYTES: usize = 1024 * 1024;

/// Attempts at finding a free id before giving up.
pub const DEFAULT_MAX_CREATE_ATTEMPTS: u32 = 5;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Seconds between reaper sweeps.
pub const DEFAULT_REAPER_INTERVAL_SECS: u64 = 300;

/// Top-level settings for [`PasteService`](crate::service::PasteService).
///
/// Missing fields fall back to their defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasteConfig {
    pub max_envelope_bytes: usize,
    pub max_create_attempts: u32,
    pub id_strategy: IdStrategy,
    /// Prefix for share links, without the `/paste/` path.
    pub base_url: String,
    pub rate_limit: RateLimitConfig,
    pub reaper_interval_secs: u64,
}

impl Default for PasteConfig {
    fn default() -> Self {
        Self {
            max_envelope_bytes: DEFAULT_MAX_ENVELOPE_BYTES,
            max_create_attempts: DEFAULT_MAX_CREATE_ATTEMPTS,
            id_strategy: IdStrategy::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            rate_limit: RateLimitConfig::default(),
            reaper_interval_secs: DEFAULT_REAPER_INTERVAL_SECS,
        }
    }
}

impl PasteConfig {
    /// Parse from JSON; absent keys take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| PasteError::Validation(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_create_attempts == 0 {
            return Err(PasteError::Validation(
                "max_create_attempts must be at least 1".into(),
            ));
        }
        if self.max_envelope_bytes == 0 {
            return Err(PasteError::Validation(
                "max_envelope_bytes must be positive".into(),
            ));
        }
        if self.reaper_interval_secs == 0 {
            return Err(PasteError::Validation(
                "reaper_interval_secs must be positive".into(),
            ));
        }
        self.rate_limit.validate()
    }

    pub fn reaper_interval(&self) -> Duration {
        Duration::from_secs(self.reaper_interval_secs)
    }
}

/// Fixed-window limits applied per client identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub limit: u32,
    pub window_ms: u64,
    pub cleanup_probability: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            window_ms: DEFAULT_WINDOW.as_millis() as u64,
            cleanup_probability: DEFAULT_CLEANUP_PROBABILITY,
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.window_ms == 0 {
            return Err(PasteError::Validation(
                "rate_limit.window_ms must be positive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.cleanup_probability) {
            return Err(PasteError::Validation(
                "rate_limit.cleanup_probability must be within [0, 1]".into(),
            ));
        }
        Ok(())
    }
}
