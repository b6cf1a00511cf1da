//! Repository for the `jobs` table.
//!
//! `claim` is the one operation whose correctness the whole broker leans
//! on: it must hand each waiting job to exactly one caller no matter how
//! many agents race for it. Everything else is an independent
//! last-writer-wins write.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::job::{Job, NewJob};
use crate::models::state::JobState;

/// Column list for `jobs` queries.
const COLUMNS: &str = "\
    job_id, queue, sequence, job_data, job_state, result_data, \
    created_at, updated_at";

/// Provides lifecycle operations for jobs.
pub struct JobRepo;

impl JobRepo {
    /// Store a new job in `waiting` state. A duplicate `job_id` surfaces
    /// as a unique violation (the id is validated or generated upstream,
    /// so this should not occur).
    pub async fn insert(pool: &PgPool, input: &NewJob) -> Result<Job, sqlx::Error> {
        let query = format!(
            "INSERT INTO jobs (job_id, queue, job_data, job_state) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(input.job_id)
            .bind(&input.queue)
            .bind(&input.job_data)
            .bind(JobState::Waiting.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a job by its id.
    pub async fn find_by_id(pool: &PgPool, job_id: Uuid) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE job_id = $1");
        sqlx::query_as::<_, Job>(&query)
            .bind(job_id)
            .fetch_optional(pool)
            .await
    }

    /// Atomically claim the oldest waiting job on any of `queues`.
    ///
    /// Single indivisible read-modify-write: the sub-select takes a row
    /// lock with `FOR UPDATE SKIP LOCKED`, so N concurrent callers racing
    /// for one job produce exactly one winner; the rest see a different
    /// job or nothing. FIFO within the matched queues by submission
    /// sequence.
    pub async fn claim(pool: &PgPool, queues: &[String]) -> Result<Option<Job>, sqlx::Error> {
        let query = format!(
            "UPDATE jobs \
             SET job_state = $1, updated_at = NOW() \
             WHERE job_id = ( \
                 SELECT job_id FROM jobs \
                 WHERE job_state = $2 AND queue = ANY($3) \
                 ORDER BY sequence \
                 LIMIT 1 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(JobState::Running.as_str())
            .bind(JobState::Waiting.as_str())
            .bind(queues)
            .fetch_optional(pool)
            .await
    }

    /// Merge free-form fields into the job's result namespace,
    /// last-writer-wins per key.
    ///
    /// The reserved `job_state` key is rejected at the validation layer
    /// before this is called; the merge itself cannot touch the state
    /// column. Returns whether the job existed.
    pub async fn set_result_fields(
        pool: &PgPool,
        job_id: Uuid,
        fields: &serde_json::Value,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE jobs \
             SET result_data = result_data || $2, updated_at = NOW() \
             WHERE job_id = $1",
        )
        .bind(job_id)
        .bind(fields)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Return the job's result namespace with the protected state merged
    /// back in under its reserved key, or `None` for an unknown job.
    pub async fn get_result_fields(
        pool: &PgPool,
        job_id: Uuid,
    ) -> Result<Option<serde_json::Value>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT result_data || jsonb_build_object('job_state', job_state) \
             FROM jobs WHERE job_id = $1",
        )
        .bind(job_id)
        .fetch_optional(pool)
        .await
    }

    /// Conditionally transition a job to `to`, unless its current state is
    /// in `excluded`. Returns whether a row was actually modified; `false`
    /// on an existing job means the transition was refused.
    pub async fn update_state(
        pool: &PgPool,
        job_id: Uuid,
        excluded: &[JobState],
        to: JobState,
    ) -> Result<bool, sqlx::Error> {
        let excluded: Vec<String> = excluded.iter().map(|s| s.as_str().to_string()).collect();
        let result = sqlx::query(
            "UPDATE jobs \
             SET job_state = $2, updated_at = NOW() \
             WHERE job_id = $1 AND job_state <> ALL($3)",
        )
        .bind(job_id)
        .bind(to.as_str())
        .bind(&excluded)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Zero-based position of `job_id` among the waiting jobs of `queue`,
    /// in submission order. `None` when the job is not in that waiting set
    /// (unknown, claimed, or terminal).
    pub async fn waiting_position(
        pool: &PgPool,
        queue: &str,
        job_id: Uuid,
    ) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT position FROM ( \
                 SELECT job_id, ROW_NUMBER() OVER (ORDER BY sequence) - 1 AS position \
                 FROM jobs \
                 WHERE queue = $1 AND job_state = $2 \
             ) waiting \
             WHERE job_id = $3",
        )
        .bind(queue)
        .bind(JobState::Waiting.as_str())
        .bind(job_id)
        .fetch_optional(pool)
        .await
    }
}
