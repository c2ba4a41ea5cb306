//! Background removal of expired pastes.
//!
//! The read path already deletes expired pastes it touches. The reaper
//! catches the ones nobody reads again.

use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;

use crate::store::{PurgeExpired, StoreError};

pub struct ExpiryReaper<P> {
    store: P,
    interval: Duration,
}

impl<P: PurgeExpired + 'static> ExpiryReaper<P> {
    pub fn new(store: P, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// One sweep at the current time.
    pub async fn run_once(&self) -> Result<usize, StoreError> {
        let removed = self.store.purge_expired(Utc::now()).await?;
        if removed > 0 {
            tracing::info!(removed, "purged expired pastes");
        }
        Ok(removed)
    }

    /// Sweep on a fixed interval until the handle is stopped. The first sweep
    /// runs immediately. Failed sweeps are logged and retried next tick.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(self) -> ReaperHandle {
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(e) = self.run_once().await {
                    tracing::warn!(error = %e, "expired paste sweep failed");
                }
            }
        });
        ReaperHandle { task }
    }
}

/// Owns the spawned sweep loop.
pub struct ReaperHandle {
    task: JoinHandle<()>,
}

impl ReaperHandle {
    pub fn stop(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for ReaperHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Duration as ChronoDuration;

    use crate::language::Language;
    use crate::store::{MemoryPasteStore, PasteStore};
    use crate::types::NewPaste;

    async fn seed(store: &MemoryPasteStore, id: &str, offset_secs: i64) {
        store
            .create(NewPaste {
                id: id.into(),
                envelope: "aXY=:Y3Q=".into(),
                language: Language::Plaintext,
                expires_at: Some(Utc::now() + ChronoDuration::seconds(offset_secs)),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn run_once_purges_expired() {
        let store = Arc::new(MemoryPasteStore::new());
        seed(&store, "expired000", -10).await;
        seed(&store, "active0000", 3600).await;

        let reaper = ExpiryReaper::new(store.clone(), Duration::from_secs(60));
        assert_eq!(reaper.run_once().await.unwrap(), 1);
        assert_eq!(reaper.run_once().await.unwrap(), 0);
        assert!(store.contains("active0000"));
    }

    #[tokio::test]
    async fn spawned_loop_sweeps_immediately_and_stops() {
        let store = Arc::new(MemoryPasteStore::new());
        seed(&store, "expired000", -10).await;

        let handle = ExpiryReaper::new(store.clone(), Duration::from_secs(3600)).spawn();
        for _ in 0..100 {
            if store.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(store.is_empty());

        handle.stop();
        for _ in 0..100 {
            if handle.is_finished() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(handle.is_finished());
    }
}
