//! Per-user agent lifecycle state and its transition table

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use thiserror::Error;

/// Lifecycle state of one agent for one user.
///
/// A missing row is treated as `Active`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
    AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AgentStatus {
    #[default]
    Active,
    Paused,
    Suspended,
    Error,
    Retired,
}

impl AgentStatus {
    /// States reachable from this one
    pub fn allowed_transitions(&self) -> &'static [AgentStatus] {
        match self {
            AgentStatus::Active => &[
                AgentStatus::Paused,
                AgentStatus::Suspended,
                AgentStatus::Error,
                AgentStatus::Retired,
            ],
            AgentStatus::Paused => &[AgentStatus::Active, AgentStatus::Suspended, AgentStatus::Retired],
            AgentStatus::Suspended => &[AgentStatus::Active, AgentStatus::Retired],
            AgentStatus::Error => &[AgentStatus::Active, AgentStatus::Retired],
            AgentStatus::Retired => &[],
        }
    }

    pub fn can_transition_to(&self, target: AgentStatus) -> bool {
        self.allowed_transitions().contains(&target)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Validate a transition, returning the target state on success
    pub fn transition(self, target: AgentStatus) -> Result<AgentStatus, StateError> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(StateError::InvalidTransition { from: self, to: target })
        }
    }
}

/// Stored agent state row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentStateRecord {
    pub user_id: i64,
    pub agent_name: String,
    pub state: AgentStatus,
    /// Minimum access tier required to run the agent, if any
    pub access_tier: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum StateError {
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition { from: AgentStatus, to: AgentStatus },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Request type for changing an agent's state
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAgentStateRequest {
    pub state: String,
    pub access_tier: Option<String>,
}
