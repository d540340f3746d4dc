//! Agent execution logs - append-only audit trail of agent invocations

use chrono::Utc;
use rusqlite::{params, Result as SqliteResult};

use crate::db::{parse_timestamp, Database};
use crate::models::{ExecutionLogRecord, NewExecutionLog};

impl Database {
    /// Append one execution log row and return it with its id and timestamp
    pub fn log_agent_execution(&self, entry: &NewExecutionLog) -> SqliteResult<ExecutionLogRecord> {
        let conn = self.conn.lock().unwrap();
        let created_at = Utc::now();

        conn.execute(
            "INSERT INTO agent_execution_logs (
                user_id, agent_name, input_prompt, response_output, success,
                execution_time_ms, error_message, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                entry.user_id,
                entry.agent_name,
                entry.input_prompt,
                entry.response_output,
                entry.success as i32,
                entry.execution_time_ms,
                entry.error_message,
                created_at.to_rfc3339(),
            ],
        )?;

        Ok(ExecutionLogRecord {
            id: conn.last_insert_rowid(),
            user_id: entry.user_id,
            agent_name: entry.agent_name.clone(),
            input_prompt: entry.input_prompt.clone(),
            response_output: entry.response_output.clone(),
            success: entry.success,
            execution_time_ms: entry.execution_time_ms,
            error_message: entry.error_message.clone(),
            created_at,
        })
    }

    /// Most recent execution logs for a user, newest first
    pub fn list_execution_logs(&self, user_id: i64, limit: i64) -> SqliteResult<Vec<ExecutionLogRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, agent_name, input_prompt, response_output, success,
                    execution_time_ms, error_message, created_at
             FROM agent_execution_logs
             WHERE user_id = ?1
             ORDER BY id DESC
             LIMIT ?2",
        )?;

        let rows = stmt
            .query_map(params![user_id, limit], |row| {
                let created_at: String = row.get(8)?;
                Ok(ExecutionLogRecord {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    agent_name: row.get(2)?,
                    input_prompt: row.get(3)?,
                    response_output: row.get(4)?,
                    success: row.get::<_, i32>(5)? != 0,
                    execution_time_ms: row.get(6)?,
                    error_message: row.get(7)?,
                    created_at: parse_timestamp(8, &created_at)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn count_execution_logs(&self, user_id: i64) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT COUNT(*) FROM agent_execution_logs WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )
    }
}
