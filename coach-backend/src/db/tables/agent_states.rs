//! Agent states table - per-user agent lifecycle
//!
//! Every mutation goes through `set_agent_state`, which enforces the
//! transition table whenever a row already exists.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::str::FromStr;

use crate::db::{parse_timestamp, Database};
use crate::models::{AgentStateRecord, AgentStatus, StateError};

fn row_to_record(row: &rusqlite::Row) -> SqliteResult<AgentStateRecord> {
    let state_str: String = row.get(2)?;
    let updated_at: String = row.get(4)?;
    let state = AgentStatus::from_str(&state_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(AgentStateRecord {
        user_id: row.get(0)?,
        agent_name: row.get(1)?,
        state,
        access_tier: row.get(3)?,
        updated_at: parse_timestamp(4, &updated_at)?,
    })
}

fn select_state(
    conn: &Connection,
    user_id: i64,
    agent_name: &str,
) -> SqliteResult<Option<AgentStateRecord>> {
    conn.query_row(
        "SELECT user_id, agent_name, state, access_tier, updated_at
         FROM agent_states WHERE user_id = ?1 AND agent_name = ?2",
        params![user_id, agent_name],
        row_to_record,
    )
    .optional()
}

impl Database {
    /// Get the stored state for an agent (None means no row, i.e. active)
    pub fn get_agent_state(
        &self,
        user_id: i64,
        agent_name: &str,
    ) -> SqliteResult<Option<AgentStateRecord>> {
        let conn = self.conn.lock().unwrap();
        select_state(&conn, user_id, agent_name)
    }

    /// All state rows for a user
    pub fn list_agent_states(&self, user_id: i64) -> SqliteResult<Vec<AgentStateRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT user_id, agent_name, state, access_tier, updated_at
             FROM agent_states WHERE user_id = ?1 ORDER BY agent_name ASC",
        )?;
        let rows = stmt
            .query_map(params![user_id], row_to_record)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// Names of agents with an explicit ACTIVE row.
    ///
    /// An empty result means either no rows exist or none are active; callers
    /// resolve that with `is_agent_active`.
    pub fn get_active_agent_names(&self, user_id: i64) -> SqliteResult<Vec<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT agent_name FROM agent_states WHERE user_id = ?1 AND state = ?2 ORDER BY id ASC",
        )?;
        let names = stmt
            .query_map(params![user_id, AgentStatus::Active.as_ref()], |row| row.get(0))?
            .collect::<SqliteResult<Vec<String>>>()?;
        Ok(names)
    }

    /// True unless an explicit non-ACTIVE row exists
    pub fn is_agent_active(&self, user_id: i64, agent_name: &str) -> SqliteResult<bool> {
        Ok(self
            .get_agent_state(user_id, agent_name)?
            .map(|record| record.state == AgentStatus::Active)
            .unwrap_or(true))
    }

    /// Create or transition an agent's state.
    ///
    /// With no existing row any state may be set directly. Otherwise the
    /// transition table applies and a rejected request leaves the row untouched.
    pub fn set_agent_state(
        &self,
        user_id: i64,
        agent_name: &str,
        state: AgentStatus,
        access_tier: Option<&str>,
    ) -> Result<AgentStateRecord, StateError> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();

        match select_state(&conn, user_id, agent_name)? {
            None => {
                conn.execute(
                    "INSERT INTO agent_states (user_id, agent_name, state, access_tier, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![user_id, agent_name, state.as_ref(), access_tier, now],
                )?;
                log::info!(
                    "[AGENT_STATE] Created {} for user {} as {}",
                    agent_name, user_id, state
                );
            }
            Some(current) => {
                let next = current.state.transition(state).inspect_err(|e| {
                    log::warn!("[AGENT_STATE] Rejected {} for user {}: {}", agent_name, user_id, e);
                })?;
                conn.execute(
                    "UPDATE agent_states
                     SET state = ?1, access_tier = COALESCE(?2, access_tier), updated_at = ?3
                     WHERE user_id = ?4 AND agent_name = ?5",
                    params![next.as_ref(), access_tier, now, user_id, agent_name],
                )?;
                log::info!(
                    "[AGENT_STATE] {} for user {}: {} → {}",
                    agent_name, user_id, current.state, next
                );
            }
        }

        select_state(&conn, user_id, agent_name)?
            .ok_or(StateError::Database(rusqlite::Error::QueryReturnedNoRows))
    }
}
