//! Coaching orchestration types

use crate::models::NewExecutionLog;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One successful agent reply returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentReply {
    #[serde(rename = "agent")]
    pub agent_name: String,
    #[serde(rename = "response")]
    pub response_text: String,
}

impl AgentReply {
    pub fn new(agent_name: impl Into<String>, response_text: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            response_text: response_text.into(),
        }
    }
}

/// Result of a single agent invocation, decided before it is logged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutcome {
    Success(String),
    Failure(String),
}

impl InvocationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, InvocationOutcome::Success(_))
    }

    /// Build the execution log row describing this outcome
    pub fn to_log_entry(
        &self,
        user_id: i64,
        agent_name: &str,
        input_prompt: &str,
        execution_time_ms: i64,
    ) -> NewExecutionLog {
        let (response_output, error_message) = match self {
            InvocationOutcome::Success(text) => (text.clone(), None),
            InvocationOutcome::Failure(reason) => (String::new(), Some(reason.clone())),
        };

        NewExecutionLog {
            user_id,
            agent_name: agent_name.to_string(),
            input_prompt: input_prompt.to_string(),
            response_output,
            success: self.is_success(),
            execution_time_ms,
            error_message,
        }
    }
}

/// An execution log write that failed after the agent outcome was decided
#[derive(Debug, Error)]
#[error("failed to record execution of '{agent}' (success: {success}): {source}")]
pub struct LogFailure {
    pub agent: String,
    /// Outcome of the invocation whose record was lost
    pub success: bool,
    #[source]
    pub source: rusqlite::Error,
}

/// Everything one orchestration run produced
#[derive(Debug, Default)]
pub struct RunReport {
    /// Successful replies in processing order
    pub replies: Vec<AgentReply>,
    /// Invocations that completed, whether or not their record was written
    pub attempted: usize,
    /// Record writes that failed; the run carried on past each of them
    pub log_failures: Vec<LogFailure>,
    /// The run stopped early because its cancellation token fired
    pub cancelled: bool,
}

#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error("failed to read coaching state: {0}")]
    Store(#[source] rusqlite::Error),

    /// One or more audit records could not be written. Every agent still ran
    /// and the replies it produced are kept here.
    #[error("failed to record {} execution log(s)", .failures.len())]
    ExecutionLog {
        failures: Vec<LogFailure>,
        replies: Vec<AgentReply>,
    },
}
