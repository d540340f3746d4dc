//! Storage operations the orchestrator depends on

use crate::db::Database;
use crate::models::{ExecutionLogRecord, NewExecutionLog};
use rusqlite::Result as SqliteResult;

pub trait CoachingStore: Send + Sync {
    /// Domains assigned to the user, in assignment order
    fn get_assignments(&self, user_id: i64) -> SqliteResult<Vec<String>>;

    /// Agents with an explicit ACTIVE row; empty when no row is active
    fn get_active_agent_names(&self, user_id: i64) -> SqliteResult<Vec<String>>;

    /// Single-domain check: active unless an explicit non-ACTIVE row exists
    fn is_agent_active(&self, user_id: i64, domain: &str) -> SqliteResult<bool>;

    fn append_execution_log(&self, entry: &NewExecutionLog) -> SqliteResult<ExecutionLogRecord>;
}

impl CoachingStore for Database {
    fn get_assignments(&self, user_id: i64) -> SqliteResult<Vec<String>> {
        Database::get_assignments(self, user_id)
    }

    fn get_active_agent_names(&self, user_id: i64) -> SqliteResult<Vec<String>> {
        Database::get_active_agent_names(self, user_id)
    }

    fn is_agent_active(&self, user_id: i64, domain: &str) -> SqliteResult<bool> {
        Database::is_agent_active(self, user_id, domain)
    }

    fn append_execution_log(&self, entry: &NewExecutionLog) -> SqliteResult<ExecutionLogRecord> {
        self.log_agent_execution(entry)
    }
}
