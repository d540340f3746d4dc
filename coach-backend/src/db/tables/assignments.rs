//! User assignments table - which coaching domains a user has opted into

use chrono::Utc;
use rusqlite::{params, Result as SqliteResult};

use crate::db::{parse_timestamp, Database};
use crate::models::Assignment;

impl Database {
    /// Domains assigned to a user, in the order they were assigned
    pub fn get_assignments(&self, user_id: i64) -> SqliteResult<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT domain FROM user_assignments WHERE user_id = ?1 ORDER BY id ASC",
        )?;
        let domains = stmt
            .query_map(params![user_id], |row| row.get::<_, String>(0))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(domains)
    }

    /// Full assignment rows for a user
    pub fn list_assignments(&self, user_id: i64) -> SqliteResult<Vec<Assignment>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT user_id, domain, created_at FROM user_assignments
             WHERE user_id = ?1 ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map(params![user_id], |row| {
                let created_at: String = row.get(2)?;
                Ok(Assignment {
                    user_id: row.get(0)?,
                    domain: row.get(1)?,
                    created_at: parse_timestamp(2, &created_at)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// Assign a domain to a user. Returns false if it was already assigned.
    pub fn add_assignment(&self, user_id: i64, domain: &str) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO user_assignments (user_id, domain, created_at) VALUES (?1, ?2, ?3)",
            params![user_id, domain, now],
        )?;
        Ok(inserted > 0)
    }

    /// Remove a domain from a user. Returns false if it was not assigned.
    pub fn remove_assignment(&self, user_id: i64, domain: &str) -> SqliteResult<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute(
            "DELETE FROM user_assignments WHERE user_id = ?1 AND domain = ?2",
            params![user_id, domain],
        )?;
        Ok(deleted > 0)
    }
}
