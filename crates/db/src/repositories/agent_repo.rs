//! Repository for the agent registry.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::agent::{Agent, AgentUpdate};

/// Log lines kept per agent; older lines fall off on upsert.
const LOG_TAIL: i64 = 100;

pub struct AgentRepo;

impl AgentRepo {
    /// Upsert an agent record. Absent fields keep their stored values; log
    /// lines are appended and the array is trimmed to its newest
    /// [`LOG_TAIL`] entries in one statement.
    pub async fn upsert(pool: &PgPool, name: &str, update: &AgentUpdate) -> Result<(), sqlx::Error> {
        let log = serde_json::Value::from(update.log.clone());
        sqlx::query(
            "INSERT INTO agents (name, state, queues, location, job_id, log, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, NOW()) \
             ON CONFLICT (name) DO UPDATE SET \
                 state      = COALESCE(EXCLUDED.state, agents.state), \
                 queues     = COALESCE(EXCLUDED.queues, agents.queues), \
                 location   = COALESCE(EXCLUDED.location, agents.location), \
                 job_id     = COALESCE(EXCLUDED.job_id, agents.job_id), \
                 log        = ( \
                     SELECT COALESCE(jsonb_agg(elem ORDER BY ord), '[]'::jsonb) \
                     FROM ( \
                         SELECT elem, ord \
                         FROM jsonb_array_elements(agents.log || EXCLUDED.log) \
                              WITH ORDINALITY AS entries (elem, ord) \
                         ORDER BY ord DESC \
                         LIMIT $7 \
                     ) tail \
                 ), \
                 updated_at = NOW()",
        )
        .bind(name)
        .bind(&update.state)
        .bind(&update.queues)
        .bind(&update.location)
        .bind(update.job_id)
        .bind(log)
        .bind(LOG_TAIL)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// All agent records, logs excluded.
    pub async fn list(pool: &PgPool) -> Result<Vec<Agent>, sqlx::Error> {
        sqlx::query_as::<_, Agent>(
            "SELECT name, state, queues, location, job_id, updated_at \
             FROM agents ORDER BY name",
        )
        .fetch_all(pool)
        .await
    }

    /// The stored log tail for one agent, newest-last.
    pub async fn log(pool: &PgPool, name: &str) -> Result<Option<Vec<String>>, sqlx::Error> {
        let log: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT log FROM agents WHERE name = $1")
                .bind(name)
                .fetch_optional(pool)
                .await?;
        Ok(log.map(|value| {
            value
                .as_array()
                .map(|lines| {
                    lines
                        .iter()
                        .filter_map(|l| l.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default()
        }))
    }

    /// Fetch one agent record, or `None` when unknown.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Agent>, sqlx::Error> {
        sqlx::query_as::<_, Agent>(
            "SELECT name, state, queues, location, job_id, updated_at \
             FROM agents WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(pool)
        .await
    }
}
