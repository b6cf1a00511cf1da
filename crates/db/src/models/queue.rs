//! Advertised queue metadata.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `queues` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QueueRecord {
    pub name: String,
    pub description: String,
    /// image-name -> provision-data map advertised by agents.
    pub images: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}
