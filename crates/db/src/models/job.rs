//! Job entity model and DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub job_id: Uuid,
    pub queue: String,
    /// Monotonically increasing submission sequence; claim and position
    /// order by it, making FIFO per queue explicit.
    pub sequence: i64,
    pub job_data: serde_json::Value,
    pub job_state: String,
    pub result_data: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// The producer's original payload with `job_id` folded back in, the
    /// shape served to both producers (fetch) and agents (claim).
    pub fn flattened(&self) -> serde_json::Value {
        let mut data = self.job_data.clone();
        if let serde_json::Value::Object(map) = &mut data {
            map.insert(
                "job_id".to_string(),
                serde_json::Value::String(self.job_id.to_string()),
            );
        }
        data
    }
}

/// Insert DTO for a validated submission.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub job_id: Uuid,
    pub queue: String,
    pub job_data: serde_json::Value,
}
