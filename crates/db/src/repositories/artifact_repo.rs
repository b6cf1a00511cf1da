//! Repository for artifact bundle storage.
//!
//! Bundles are stored as whole versions split into fixed-size chunks.
//! Repeated puts for one job accumulate versions; reads serve only the
//! latest. This crate never deletes a version: expiry belongs to an
//! external reaper keyed on the `uploaded_at` stamp every chunk carries.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Physical chunk size for stored bundles.
pub const CHUNK_SIZE: usize = 255 * 1024;

pub struct ArtifactRepo;

impl ArtifactRepo {
    /// Store a new version of the job's artifact bundle.
    ///
    /// One transaction inserts the version row and its chunks; every chunk
    /// carries the version's single upload timestamp.
    pub async fn put(pool: &PgPool, job_id: Uuid, data: &[u8]) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (version_id, uploaded_at): (i64, DateTime<Utc>) = sqlx::query_as(
            "INSERT INTO artifact_versions (job_id, file_name, uploaded_at) \
             VALUES ($1, $2, NOW()) \
             RETURNING id, uploaded_at",
        )
        .bind(job_id)
        .bind(format!("{job_id}.artifact"))
        .fetch_one(&mut *tx)
        .await?;

        for (index, chunk) in data.chunks(CHUNK_SIZE).enumerate() {
            sqlx::query(
                "INSERT INTO artifact_chunks (version_id, chunk_index, data, uploaded_at) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(version_id)
            .bind(index as i32)
            .bind(chunk)
            .bind(uploaded_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await
    }

    /// Reassemble the most recently uploaded version, or `None` when the
    /// job has no artifact.
    pub async fn get(pool: &PgPool, job_id: Uuid) -> Result<Option<Vec<u8>>, sqlx::Error> {
        let version_id: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM artifact_versions \
             WHERE job_id = $1 \
             ORDER BY uploaded_at DESC, id DESC \
             LIMIT 1",
        )
        .bind(job_id)
        .fetch_optional(pool)
        .await?;

        let Some(version_id) = version_id else {
            return Ok(None);
        };

        let chunks: Vec<Vec<u8>> = sqlx::query_scalar(
            "SELECT data FROM artifact_chunks \
             WHERE version_id = $1 \
             ORDER BY chunk_index",
        )
        .bind(version_id)
        .fetch_all(pool)
        .await?;

        Ok(Some(chunks.concat()))
    }
}
