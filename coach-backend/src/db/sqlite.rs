//! SQLite database - schema definitions and connection management
//!
//! This file contains:
//! - Database struct definition
//! - Connection management (new, init)
//! - Schema creation
//!
//! All table operations live in the tables/ subdirectory.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, Result as SqliteResult};
use std::path::Path;
use std::sync::Mutex;

/// Main database wrapper; the Mutex serializes access to the single connection
pub struct Database {
    pub(crate) conn: Mutex<Connection>,
}

impl Database {
    /// Create a new database connection and initialize schema
    pub fn new(database_url: &str) -> SqliteResult<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = Path::new(database_url).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).ok();
            }
        }

        let conn = Connection::open(database_url)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init()?;
        Ok(db)
    }

    /// In-memory database, used by tests
    #[cfg(test)]
    pub fn in_memory() -> SqliteResult<Self> {
        Self::new(":memory:")
    }

    /// Initialize all database tables
    fn init(&self) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();

        // Domains each user has opted into
        conn.execute(
            "CREATE TABLE IF NOT EXISTS user_assignments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                domain TEXT NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE(user_id, domain)
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_user_assignments_user ON user_assignments(user_id)",
            [],
        )?;

        // Per-user agent lifecycle state (no row means active)
        conn.execute(
            "CREATE TABLE IF NOT EXISTS agent_states (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                agent_name TEXT NOT NULL,
                state TEXT NOT NULL DEFAULT 'active',
                access_tier TEXT,
                updated_at TEXT NOT NULL,
                UNIQUE(user_id, agent_name)
            )",
            [],
        )?;

        // Agent execution audit log (append-only)
        conn.execute(
            "CREATE TABLE IF NOT EXISTS agent_execution_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                agent_name TEXT NOT NULL,
                input_prompt TEXT NOT NULL,
                response_output TEXT NOT NULL DEFAULT '',
                success INTEGER NOT NULL,
                execution_time_ms INTEGER NOT NULL,
                error_message TEXT,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_agent_execution_logs_user ON agent_execution_logs(user_id, created_at)",
            [],
        )?;

        Ok(())
    }
}

/// Parse an RFC 3339 column value, surfacing bad data as a conversion error
pub(crate) fn parse_timestamp(idx: usize, raw: &str) -> SqliteResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_idempotent_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("coach.db");
        let path = path.to_str().unwrap();

        let db = Database::new(path).unwrap();
        db.add_assignment(1, "career").unwrap();
        drop(db);

        // Re-opening runs init again against the existing tables
        let db = Database::new(path).unwrap();
        assert_eq!(db.get_assignments(1).unwrap(), vec!["career".to_string()]);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp(0, "2026-01-02T03:04:05+00:00").is_ok());
        assert!(parse_timestamp(0, "yesterday").is_err());
    }
}
