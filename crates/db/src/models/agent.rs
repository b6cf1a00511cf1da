//! Agent registry models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `agents` table, log excluded (it is capped but still the
/// widest column; listings never need it).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Agent {
    pub name: String,
    pub state: Option<String>,
    pub queues: Option<serde_json::Value>,
    pub location: Option<String>,
    pub job_id: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

/// Upsert DTO posted by an agent. Absent fields keep their stored values;
/// `log` lines are appended, keeping only the newest 100.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentUpdate {
    pub state: Option<String>,
    pub queues: Option<serde_json::Value>,
    pub location: Option<String>,
    pub job_id: Option<Uuid>,
    #[serde(default)]
    pub log: Vec<String>,
}
