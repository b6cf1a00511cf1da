//! Repository for the `job_output` table.

use sqlx::PgPool;
use uuid::Uuid;

/// Default per-job buffer bound, in chunks. Appends beyond it drop the
/// oldest rows, so an agent that is never polled cannot grow the table
/// without bound while the newest output stays available.
pub const MAX_BUFFERED_CHUNKS: i64 = 10_000;

/// Append-only output buffer with destructive read.
pub struct OutputRepo;

impl OutputRepo {
    /// Push one chunk onto the job's buffer, then prune rows beyond
    /// `max_buffered` (oldest first).
    pub async fn append(
        pool: &PgPool,
        job_id: Uuid,
        chunk: &str,
        max_buffered: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO job_output (job_id, chunk) VALUES ($1, $2)")
            .bind(job_id)
            .bind(chunk)
            .execute(pool)
            .await?;

        sqlx::query(
            "DELETE FROM job_output \
             WHERE id IN ( \
                 SELECT id FROM job_output \
                 WHERE job_id = $1 \
                 ORDER BY id DESC \
                 OFFSET $2 \
             )",
        )
        .bind(job_id)
        .bind(max_buffered)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Fetch-and-clear the job's buffer in one statement.
    ///
    /// The CTE makes the read destructive and atomic: a chunk appended
    /// concurrently either survives for the next drain or is returned
    /// here, never both and never neither. Returns the chunks joined with
    /// newlines in append order, or `None` when nothing is buffered.
    pub async fn drain(pool: &PgPool, job_id: Uuid) -> Result<Option<String>, sqlx::Error> {
        let chunks: Vec<String> = sqlx::query_scalar(
            "WITH drained AS ( \
                 DELETE FROM job_output WHERE job_id = $1 \
                 RETURNING id, chunk \
             ) \
             SELECT chunk FROM drained ORDER BY id",
        )
        .bind(job_id)
        .fetch_all(pool)
        .await?;

        if chunks.is_empty() {
            Ok(None)
        } else {
            Ok(Some(chunks.join("\n")))
        }
    }
}
