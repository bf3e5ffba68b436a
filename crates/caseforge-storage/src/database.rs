// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use caseforge_core::CaseforgeError;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::migrations;

/// Timestamp text format stored in every datetime column.
/// Fixed width, UTC, millisecond precision -- lexicographic order is
/// chronological and SQLite's date functions accept it directly.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Handle to the SQLite database behind a tokio-rusqlite worker thread.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply pragmas, and run all
    /// pending migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, CaseforgeError> {
        let conn = tokio_rusqlite::Connection::open(path.to_owned())
            .await
            .map_err(|e| map_tr_err(e.into()))?;

        conn.call(move |conn| -> Result<(), CaseforgeError> {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")
                    .map_err(|e| CaseforgeError::Storage {
                        source: Box::new(e),
                    })?;
            }
            conn.pragma_update(None, "foreign_keys", "ON")
                .map_err(|e| CaseforgeError::Storage {
                    source: Box::new(e),
                })?;
            migrations::run_migrations(conn)?;
            Ok(())
        })
        .await
        .map_err(|e| CaseforgeError::Storage {
            source: Box::new(e),
        })?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// Returns the underlying connection handle.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL and flush pending writes.
    pub async fn close(&self) -> Result<(), CaseforgeError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Map a tokio-rusqlite transport error into the storage error variant.
pub fn map_tr_err(err: tokio_rusqlite::Error) -> CaseforgeError {
    CaseforgeError::Storage {
        source: Box::new(err),
    }
}

/// Render a timestamp for storage.
pub(crate) fn to_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

pub(crate) fn to_timestamp_opt(dt: &Option<DateTime<Utc>>) -> Option<String> {
    dt.as_ref().map(to_timestamp)
}

/// Parse a stored timestamp back into `DateTime<Utc>`.
pub(crate) fn parse_timestamp(text: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

pub(crate) fn parse_timestamp_opt(
    text: Option<String>,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    text.as_deref().map(parse_timestamp).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn timestamps_round_trip_at_millisecond_precision() {
        let now = Utc::now();
        let text = to_timestamp(&now);
        let parsed = parse_timestamp(&text).unwrap();
        assert!((now - parsed).num_milliseconds().abs() < 1);
    }

    #[test]
    fn timestamp_order_is_lexicographic() {
        let earlier = Utc::now();
        let later = earlier + chrono::Duration::seconds(7);
        assert!(to_timestamp(&earlier) < to_timestamp(&later));
    }

    #[test]
    fn malformed_timestamp_is_a_conversion_failure() {
        assert!(parse_timestamp("not-a-date").is_err());
    }

    #[tokio::test]
    async fn open_creates_database_and_applies_schema() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("open.db");
        let db = Database::open(db_path.to_str().unwrap(), true).await.unwrap();

        let tables: Vec<String> = db
            .connection()
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
                )?;
                let rows = stmt.query_map([], |row| row.get(0))?;
                let mut names = Vec::new();
                for row in rows {
                    names.push(row?);
                }
                Ok::<_, rusqlite::Error>(names)
            })
            .await
            .unwrap();

        for required in [
            "messages",
            "message_attributes",
            "investigations",
            "investigation_actions",
        ] {
            assert!(tables.iter().any(|t| t == required), "missing {required}");
        }

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("reopen.db");
        let path = db_path.to_str().unwrap();

        let db = Database::open(path, true).await.unwrap();
        db.close().await.unwrap();
        drop(db);

        // Migrations already applied; second open must not fail.
        let db = Database::open(path, true).await.unwrap();
        db.close().await.unwrap();
    }
}
