//! SQLite-backed paste store.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};

use super::traits::{PasteStore, PurgeExpired, StoreError};
use crate::language::Language;
use crate::types::{NewPaste, PasteRecord};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS pastes (
    id                TEXT PRIMARY KEY NOT NULL,
    encrypted_content TEXT NOT NULL,
    language          TEXT NOT NULL DEFAULT 'plaintext',
    created_at        TEXT NOT NULL,
    expires_at        TEXT
);
CREATE INDEX IF NOT EXISTS idx_pastes_expires_at ON pastes(expires_at);
";

/// Single-connection store. Statements run synchronously under the lock;
/// each one is short and touches one row or one indexed range.
pub struct SqlitePasteStore {
    conn: Mutex<Connection>,
}

impl SqlitePasteStore {
    /// Open (or create) a database file and ensure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(backend)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(backend)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA).map_err(backend)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

// ============================================================================
// Row mapping
// ============================================================================

struct RawRow {
    id: String,
    envelope: String,
    language: String,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl RawRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            envelope: row.get(1)?,
            language: row.get(2)?,
            created_at: row.get(3)?,
            expires_at: row.get(4)?,
        })
    }

    fn into_record(self) -> Result<PasteRecord, StoreError> {
        let language = self
            .language
            .parse::<Language>()
            .map_err(|e| StoreError::Backend(format!("bad language column: {e}")))?;
        Ok(PasteRecord {
            id: self.id,
            envelope: self.envelope,
            language,
            created_at: self.created_at,
            expires_at: self.expires_at,
        })
    }
}

fn backend(err: rusqlite::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

// ============================================================================
// Trait impls
// ============================================================================

#[async_trait]
impl PasteStore for SqlitePasteStore {
    async fn create(&self, paste: NewPaste) -> Result<PasteRecord, StoreError> {
        let record = paste.into_record(Utc::now());
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO pastes (id, encrypted_content, language, created_at, expires_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.id,
                record.envelope,
                record.language.as_str(),
                record.created_at,
                record.expires_at,
            ],
        )
        .map_err(|e| {
            if is_constraint_violation(&e) {
                StoreError::Conflict(record.id.clone())
            } else {
                backend(e)
            }
        })?;
        Ok(record)
    }

    async fn get(&self, id: &str) -> Result<PasteRecord, StoreError> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT id, encrypted_content, language, created_at, expires_at
             FROM pastes WHERE id = ?1",
            params![id],
            RawRow::from_row,
        )
        .optional()
        .map_err(backend)?
        .ok_or(StoreError::NotFound)?
        .into_record()
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM pastes WHERE id = ?1", params![id])
            .map_err(backend)?;
        Ok(())
    }
}

#[async_trait]
impl PurgeExpired for SqlitePasteStore {
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "DELETE FROM pastes WHERE expires_at IS NOT NULL AND expires_at < ?1",
            params![now],
        )
        .map_err(backend)
    }
}
