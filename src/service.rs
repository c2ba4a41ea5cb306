//! `PasteService`: the create and read pipelines over a [`PasteStore`].
//!
//! Create: classify, generate a key, seal, store under a fresh id, hand the
//! key back. Read: fetch, enforce expiry (deleting on the way), open with the
//! caller's key. Keys and plaintext never reach the store or the logs.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sealbin_crypto::{Envelope, PasteKey};

use crate::client::{client_identifier, HeaderLookup};
use crate::config::PasteConfig;
use crate::error::{PasteError, Result};
use crate::expiration::{calculate_expiration_date, ExpirationOption};
use crate::formatter::format_code;
use crate::id::{generate_id_with, is_valid_id};
use crate::language::{detect_language, Language};
use crate::link::ShareLink;
use crate::rate_limit::{FixedWindowLimiter, RateLimiter};
use crate::store::{PasteStore, StoreError};
use crate::types::{CreateOptions, CreatedPaste, NewPaste, OpenedPaste, PasteRecord};

pub struct PasteService<S: PasteStore> {
    store: S,
    config: PasteConfig,
    limiter: Arc<dyn RateLimiter>,
}

impl<S: PasteStore> PasteService<S> {
    /// Service with default configuration and an in-memory rate limiter.
    pub fn new(store: S) -> Self {
        Self::build(store, PasteConfig::default())
    }

    /// Service with explicit configuration. The config is validated first, so
    /// a zero window or zero attempt budget is rejected rather than adjusted.
    pub fn with_config(store: S, config: PasteConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(store, config))
    }

    fn build(store: S, config: PasteConfig) -> Self {
        let limiter = Arc::new(FixedWindowLimiter::with_cleanup_probability(
            config.rate_limit.cleanup_probability,
        ));
        Self {
            store,
            config,
            limiter,
        }
    }

    /// Replace the rate limiter, e.g. with one shared across instances.
    pub fn with_rate_limiter(mut self, limiter: Arc<dyn RateLimiter>) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &PasteConfig {
        &self.config
    }

    // ========================================================================
    // Admission
    // ========================================================================

    /// Count one request against `identifier`'s window.
    pub fn check_rate_limit(&self, identifier: &str) -> Result<()> {
        let limits = &self.config.rate_limit;
        if self.limiter.allow(identifier, limits.limit, limits.window()) {
            Ok(())
        } else {
            tracing::debug!(client = %identifier, "rate limited");
            Err(PasteError::RateLimited)
        }
    }

    /// [`check_rate_limit`](Self::check_rate_limit) keyed by the client
    /// address found in `headers`.
    pub fn check_client<H: HeaderLookup + ?Sized>(&self, headers: &H) -> Result<()> {
        self.check_rate_limit(&client_identifier(headers))
    }

    // ========================================================================
    // Create
    // ========================================================================

    /// Store an envelope that was sealed elsewhere. The key never passes
    /// through here.
    ///
    /// Size and wire shape are checked before any store call. Id collisions
    /// are retried with fresh ids up to `max_create_attempts`.
    pub async fn submit(
        &self,
        envelope: &str,
        language: Language,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<PasteRecord> {
        if envelope.len() > self.config.max_envelope_bytes {
            return Err(PasteError::Validation(format!(
                "content exceeds maximum size of {} bytes",
                self.config.max_envelope_bytes
            )));
        }
        Envelope::from_wire(envelope)?;

        let attempts = self.config.max_create_attempts;
        for attempt in 1..=attempts {
            let id = generate_id_with(self.config.id_strategy)?;
            let paste = NewPaste {
                id,
                envelope: envelope.to_string(),
                language,
                expires_at,
            };
            match self.store.create(paste).await {
                Ok(record) => {
                    tracing::debug!(
                        id = %record.id,
                        language = %record.language,
                        expires_at = ?record.expires_at,
                        "paste stored"
                    );
                    return Ok(record);
                }
                Err(StoreError::Conflict(id)) => {
                    tracing::warn!(%id, attempt, "paste id collision, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(PasteError::Store(format!(
            "no free paste id after {attempts} attempts"
        )))
    }

    /// Seal `content` under a fresh key and store it.
    ///
    /// The returned [`CreatedPaste`] carries the exported key and the share
    /// link; nothing else retains the key.
    pub async fn create(&self, content: &str, options: CreateOptions) -> Result<CreatedPaste> {
        if content.trim().is_empty() {
            return Err(PasteError::Validation("content is empty".into()));
        }

        let expires_at = resolve_expiration(&options)?;
        let language = options
            .language
            .unwrap_or_else(|| detect_language(content));
        let content = if options.format {
            format_code(content, language)
        } else {
            content.to_string()
        };

        let key = PasteKey::generate()?;
        let envelope = Envelope::seal(content.as_bytes(), &key)?.to_wire();
        let record = self.submit(&envelope, language, expires_at).await?;

        let link = ShareLink::new(record.id, key.export());
        Ok(CreatedPaste {
            url: link.to_url(&self.config.base_url),
            id: link.id,
            key: link.key,
            language: record.language,
            expires_at: record.expires_at,
        })
    }

    // ========================================================================
    // Read
    // ========================================================================

    /// Fetch a sealed record, enforcing expiry.
    ///
    /// An expired record is deleted before [`PasteError::Expired`] is
    /// returned; if that delete fails it is logged and the error still
    /// surfaces. Ids that could never have been generated are `NotFound`
    /// without a store round trip.
    pub async fn fetch(&self, id: &str) -> Result<PasteRecord> {
        if !is_valid_id(id) {
            return Err(PasteError::NotFound);
        }

        let record = self.store.get(id).await?;
        if record.is_expired_at(Utc::now()) {
            if let Err(e) = self.store.delete(id).await {
                tracing::warn!(%id, error = %e, "failed to delete expired paste");
            } else {
                tracing::debug!(%id, "expired paste deleted on read");
            }
            return Err(PasteError::Expired);
        }

        tracing::debug!(%id, language = %record.language, "paste fetched");
        Ok(record)
    }

    /// Fetch and decrypt with an exported key.
    pub async fn open(&self, id: &str, key: &str) -> Result<OpenedPaste> {
        if key.trim().is_empty() {
            return Err(PasteError::MissingKey);
        }

        let record = self.fetch(id).await?;
        let key = PasteKey::import(key)?;
        let plaintext = Envelope::from_wire(&record.envelope)?.open(&key)?;

        Ok(OpenedPaste {
            content: String::from_utf8_lossy(&plaintext).into_owned(),
            id: record.id,
            language: record.language,
            created_at: record.created_at,
            expires_at: record.expires_at,
        })
    }

    /// [`open`](Self::open) using the id and key carried by a share link.
    pub async fn open_link(&self, url: &str) -> Result<OpenedPaste> {
        let link = ShareLink::parse(url)?;
        self.open(&link.id, &link.key).await
    }

    /// Remove a paste. Absent ids succeed.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.store.delete(id).await?;
        tracing::debug!(%id, "paste deleted");
        Ok(())
    }
}

fn resolve_expiration(options: &CreateOptions) -> Result<Option<DateTime<Utc>>> {
    if options.expiration != ExpirationOption::Custom {
        return Ok(calculate_expiration_date(options.expiration, None));
    }
    match options.custom_expires_at {
        Some(at) if at > Utc::now() => Ok(Some(at)),
        Some(_) => Err(PasteError::Validation(
            "custom expiration must be in the future".into(),
        )),
        None => Err(PasteError::Validation(
            "custom expiration requires a date".into(),
        )),
    }
}
