//! Repository for advertised queue metadata.

use sqlx::PgPool;

use crate::models::queue::QueueRecord;

pub struct QueueRepo;

impl QueueRepo {
    /// Advertise a queue, updating the description if it already exists.
    pub async fn upsert(pool: &PgPool, name: &str, description: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO queues (name, description) VALUES ($1, $2) \
             ON CONFLICT (name) DO UPDATE \
             SET description = EXCLUDED.description, updated_at = NOW()",
        )
        .bind(name)
        .bind(description)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// All advertised queues.
    pub async fn list(pool: &PgPool) -> Result<Vec<QueueRecord>, sqlx::Error> {
        sqlx::query_as::<_, QueueRecord>(
            "SELECT name, description, images, updated_at FROM queues ORDER BY name",
        )
        .fetch_all(pool)
        .await
    }

    /// Replace the image map advertised for a queue, creating the queue
    /// record if needed.
    pub async fn set_images(
        pool: &PgPool,
        name: &str,
        images: &serde_json::Value,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO queues (name, images) VALUES ($1, $2) \
             ON CONFLICT (name) DO UPDATE \
             SET images = EXCLUDED.images, updated_at = NOW()",
        )
        .bind(name)
        .bind(images)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Image map for a queue; `None` when the queue is unknown.
    pub async fn images(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<serde_json::Value>, sqlx::Error> {
        sqlx::query_scalar("SELECT images FROM queues WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await
    }
}
