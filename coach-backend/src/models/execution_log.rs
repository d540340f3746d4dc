use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit row for one agent invocation attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionLogRecord {
    pub id: i64,
    pub user_id: i64,
    pub agent_name: String,
    pub input_prompt: String,
    pub response_output: String,
    pub success: bool,
    pub execution_time_ms: i64,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Values for an execution log row that has not been written yet
#[derive(Debug, Clone)]
pub struct NewExecutionLog {
    pub user_id: i64,
    pub agent_name: String,
    pub input_prompt: String,
    pub response_output: String,
    pub success: bool,
    pub execution_time_ms: i64,
    pub error_message: Option<String>,
}
