//! Database table modules - extends Database with domain-specific methods
//!
//! Each module adds `impl Database` blocks with methods for a specific table group.

mod agent_states;   // agent_states
mod assignments;    // user_assignments
mod execution_logs; // agent_execution_logs
