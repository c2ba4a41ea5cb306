//! Integration tests for `PasteService` over the provided stores.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sealbin::{
    crypto::{Envelope, PasteKey},
    expiration::ExpirationState,
    ExpirationOption, Language, MemoryPasteStore, NewPaste, PasteConfig, PasteError,
    PasteRecord, PasteService, PasteStore, ShareLink, StoreError, CreateOptions,
};

// ============================================================================
// Helpers
// ============================================================================

/// Wraps a store, counting calls and injecting failures.
#[derive(Default)]
struct ScriptedStore {
    inner: MemoryPasteStore,
    creates: AtomicUsize,
    gets: AtomicUsize,
    /// Number of leading creates answered with `Conflict`.
    conflicts: usize,
    fail_deletes: bool,
}

#[async_trait]
impl PasteStore for ScriptedStore {
    async fn create(&self, paste: NewPaste) -> Result<PasteRecord, StoreError> {
        let n = self.creates.fetch_add(1, Ordering::SeqCst);
        if n < self.conflicts {
            return Err(StoreError::Conflict(paste.id));
        }
        self.inner.create(paste).await
    }

    async fn get(&self, id: &str) -> Result<PasteRecord, StoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(id).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        if self.fail_deletes {
            return Err(StoreError::Backend("delete unavailable".into()));
        }
        self.inner.delete(id).await
    }
}

fn never() -> CreateOptions {
    CreateOptions {
        expiration: ExpirationOption::Never,
        ..Default::default()
    }
}

fn expired_record(id: &str) -> PasteRecord {
    let key = PasteKey::generate().unwrap();
    PasteRecord {
        id: id.into(),
        envelope: Envelope::seal(b"stale", &key).unwrap().to_wire(),
        language: Language::Plaintext,
        created_at: Utc::now() - Duration::days(2),
        expires_at: Some(Utc::now() - Duration::seconds(1)),
    }
}

// ============================================================================
// Create / open
// ============================================================================

#[tokio::test]
async fn create_then_open_round_trip() {
    let svc = PasteService::new(MemoryPasteStore::new());
    let created = svc
        .create("package main\nfunc main() {}", CreateOptions::default())
        .await
        .unwrap();

    assert_eq!(created.id.len(), 10);
    assert_eq!(created.language, Language::Go);
    assert!(created.expires_at.is_some());
    assert_eq!(
        created.url,
        format!("http://localhost:3000/paste/{}#{}", created.id, created.key)
    );

    let opened = svc.open(&created.id, &created.key).await.unwrap();
    assert_eq!(opened.content, "package main\nfunc main() {}");
    assert_eq!(opened.language, Language::Go);

    let via_link = svc.open_link(&created.url).await.unwrap();
    assert_eq!(via_link, opened);
}

#[tokio::test]
async fn store_never_sees_plaintext_or_key() {
    let svc = PasteService::new(MemoryPasteStore::new());
    let created = svc.create("top secret words", never()).await.unwrap();

    let record = svc.store().get(&created.id).await.unwrap();
    assert!(!record.envelope.contains("top secret"));
    assert!(!record.envelope.contains(&created.key));
    assert_eq!(record.state_at(Utc::now()), ExpirationState::Permanent);
}

#[tokio::test]
async fn explicit_language_overrides_detection() {
    let svc = PasteService::new(MemoryPasteStore::new());
    let created = svc
        .create(
            r#"{"a":1}"#,
            CreateOptions {
                language: Some(Language::Plaintext),
                ..never()
            },
        )
        .await
        .unwrap();
    assert_eq!(created.language, Language::Plaintext);
}

#[tokio::test]
async fn wrong_key_is_decryption_failure() {
    let svc = PasteService::new(MemoryPasteStore::new());
    let created = svc.create("hello", never()).await.unwrap();
    let other = PasteKey::generate().unwrap().export();

    assert_eq!(
        svc.open(&created.id, &other).await,
        Err(PasteError::DecryptionFailure)
    );
}

#[tokio::test]
async fn garbage_key_is_invalid_key_format() {
    let svc = PasteService::new(MemoryPasteStore::new());
    let created = svc.create("hello", never()).await.unwrap();

    assert_eq!(
        svc.open(&created.id, "not base64!").await,
        Err(PasteError::InvalidKeyFormat)
    );
    assert_eq!(
        svc.open(&created.id, "AAAA").await,
        Err(PasteError::InvalidKeyFormat)
    );
}

#[tokio::test]
async fn link_without_fragment_is_missing_key() {
    let svc = PasteService::new(MemoryPasteStore::new());
    let created = svc.create("hello", never()).await.unwrap();
    let bare = ShareLink::new(created.id, "").to_url("http://localhost:3000");

    assert_eq!(svc.open_link(&bare).await, Err(PasteError::MissingKey));
}

// ============================================================================
// Expiry
// ============================================================================

#[tokio::test]
async fn expired_paste_is_deleted_on_read() {
    let svc = PasteService::new(MemoryPasteStore::new());
    svc.store().insert_record(expired_record("expired000"));

    assert_eq!(svc.fetch("expired000").await, Err(PasteError::Expired));
    assert!(!svc.store().contains("expired000"));
    assert_eq!(svc.fetch("expired000").await, Err(PasteError::NotFound));
}

#[tokio::test]
async fn failed_lazy_delete_still_reports_expired() {
    let store = ScriptedStore {
        fail_deletes: true,
        ..Default::default()
    };
    store.inner.insert_record(expired_record("expired000"));
    let svc = PasteService::new(store);

    assert_eq!(svc.fetch("expired000").await, Err(PasteError::Expired));
    assert!(svc.store().inner.contains("expired000"));
}

#[tokio::test]
async fn custom_expiration_is_stored() {
    let svc = PasteService::new(MemoryPasteStore::new());
    let at = Utc::now() + Duration::days(10);
    let created = svc
        .create(
            "hello",
            CreateOptions {
                expiration: ExpirationOption::Custom,
                custom_expires_at: Some(at),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(created.expires_at, Some(at));
}

// ============================================================================
// Submission guards
// ============================================================================

#[tokio::test]
async fn conflicting_ids_are_retried() {
    let svc = PasteService::new(ScriptedStore {
        conflicts: 2,
        ..Default::default()
    });
    let created = svc.create("hello", never()).await.unwrap();

    assert_eq!(svc.store().creates.load(Ordering::SeqCst), 3);
    assert!(svc.open(&created.id, &created.key).await.is_ok());
}

#[tokio::test]
async fn retries_are_bounded() {
    let svc = PasteService::new(ScriptedStore {
        conflicts: usize::MAX,
        ..Default::default()
    });

    assert!(matches!(
        svc.create("hello", never()).await,
        Err(PasteError::Store(_))
    ));
    assert_eq!(svc.store().creates.load(Ordering::SeqCst), 5);
}

#[tokio::test]
async fn oversized_envelope_is_rejected_before_store() {
    let config = PasteConfig {
        max_envelope_bytes: 64,
        ..Default::default()
    };
    let svc = PasteService::with_config(ScriptedStore::default(), config).unwrap();

    let result = svc.create(&"x".repeat(100), never()).await;
    assert!(matches!(result, Err(PasteError::Validation(_))));
    assert_eq!(svc.store().creates.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn submit_accepts_pre_sealed_envelope() {
    let svc = PasteService::new(MemoryPasteStore::new());
    let key = PasteKey::generate().unwrap();
    let wire = Envelope::seal(b"sealed elsewhere", &key).unwrap().to_wire();

    let record = svc.submit(&wire, Language::Markdown, None).await.unwrap();
    assert_eq!(record.envelope, wire);

    let opened = svc.open(&record.id, &key.export()).await.unwrap();
    assert_eq!(opened.content, "sealed elsewhere");
    assert_eq!(opened.language, Language::Markdown);
}

#[tokio::test]
async fn malformed_ids_skip_the_store() {
    let svc = PasteService::new(ScriptedStore::default());
    assert_eq!(svc.fetch("short").await, Err(PasteError::NotFound));
    assert_eq!(svc.fetch("has/slash00").await, Err(PasteError::NotFound));
    assert_eq!(svc.store().gets.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn delete_removes_paste() {
    let svc = PasteService::new(Arc::new(MemoryPasteStore::new()));
    let created = svc.create("bye", never()).await.unwrap();
    svc.delete(&created.id).await.unwrap();
    svc.delete(&created.id).await.unwrap();
    assert_eq!(svc.fetch(&created.id).await, Err(PasteError::NotFound));
}

// ============================================================================
// SQLite
// ============================================================================

#[cfg(feature = "sqlite")]
#[tokio::test]
async fn sqlite_file_store_survives_reopen() {
    use sealbin::SqlitePasteStore;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pastes.db");

    let created = {
        let svc = PasteService::new(SqlitePasteStore::open(&path).unwrap());
        svc.create("fn main() {}", never()).await.unwrap()
    };

    let svc = PasteService::new(SqlitePasteStore::open(&path).unwrap());
    let opened = svc.open(&created.id, &created.key).await.unwrap();
    assert_eq!(opened.content, "fn main() {}");
    assert_eq!(opened.language, created.language);
}
