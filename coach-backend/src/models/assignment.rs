use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's opt-in to a coaching domain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub user_id: i64,
    pub domain: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssignmentRequest {
    pub domain: String,
}
