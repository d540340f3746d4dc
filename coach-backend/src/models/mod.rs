pub mod agent_state;
pub mod assignment;
pub mod execution_log;

pub use agent_state::{AgentStateRecord, AgentStatus, StateError, UpdateAgentStateRequest};
pub use assignment::{Assignment, CreateAssignmentRequest};
pub use execution_log::{ExecutionLogRecord, NewExecutionLog};
