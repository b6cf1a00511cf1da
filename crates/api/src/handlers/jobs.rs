//! Handlers for the `/jobs` resource: submission, the atomic claim,
//! definition reads, queue position, and job actions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use benchline_core::error::CoreError;
use benchline_core::submission::parse_submission;
use benchline_db::models::job::NewJob;
use benchline_db::models::state::JobState;
use benchline_db::repositories::JobRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Response for POST /jobs.
#[derive(Debug, Serialize)]
pub struct JobIdResponse {
    pub job_id: Uuid,
}

/// Request body for POST /jobs/claim.
#[derive(Debug, Deserialize)]
pub struct ClaimRequest {
    /// Queues the agent services. Must not be empty.
    #[serde(default)]
    pub queues: Vec<String>,
}

/// Request body for POST /jobs/{id}/action.
#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub action: String,
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// POST /api/v1/jobs
///
/// Submit a job to a queue. The payload is opaque apart from the required
/// `job_queue` name and an optional `job_id` for resubmission. Returns the
/// generated (or preserved) job id.
pub async fn submit_job(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> AppResult<impl IntoResponse> {
    let submission = parse_submission(payload)?;

    state.metrics.job_submitted(&submission.queue);
    if submission.reservation {
        state.metrics.reservation_requested(&submission.queue);
    }

    let job = JobRepo::insert(
        &state.pool,
        &NewJob {
            job_id: submission.job_id,
            queue: submission.queue,
            job_data: submission.job_data,
        },
    )
    .await?;

    tracing::info!(
        job_id = %job.job_id,
        queue = %job.queue,
        resubmission = submission.resubmission,
        "Job submitted",
    );

    Ok(Json(DataResponse {
        data: JobIdResponse { job_id: job.job_id },
    }))
}

// ---------------------------------------------------------------------------
// Claim
// ---------------------------------------------------------------------------

/// POST /api/v1/jobs/claim
///
/// Atomically claim the next waiting job on any of the supplied queues.
/// Returns the flattened job definition, or 204 when nothing is waiting.
pub async fn claim_job(
    State(state): State<AppState>,
    Json(input): Json<ClaimRequest>,
) -> AppResult<Response> {
    if input.queues.is_empty() {
        return Err(CoreError::Validation("no queue(s) specified in request".into()).into());
    }

    match JobRepo::claim(&state.pool, &input.queues).await? {
        Some(job) => {
            tracing::info!(job_id = %job.job_id, queue = %job.queue, "Job claimed");
            Ok(Json(DataResponse { data: job.flattened() }).into_response())
        }
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

/// GET /api/v1/jobs/{id}
///
/// The job definition as submitted, flattened with its id, even after the
/// job has run. 204 when the id is unknown.
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> AppResult<Response> {
    match JobRepo::find_by_id(&state.pool, job_id).await? {
        Some(job) => Ok(Json(DataResponse { data: job.flattened() }).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// GET /api/v1/jobs/{id}/position
///
/// Zero-based position of the job in its queue's waiting set, in
/// submission order. 410 when the job is unknown or no longer waiting --
/// pollers use the distinction to stop asking.
pub async fn get_position(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let job = JobRepo::find_by_id(&state.pool, job_id)
        .await?
        .ok_or_else(|| AppError::Gone("job not found or already started".into()))?;

    let position = JobRepo::waiting_position(&state.pool, &job.queue, job_id)
        .await?
        .ok_or_else(|| AppError::Gone("job not found or already started".into()))?;

    Ok(Json(DataResponse { data: position }))
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// POST /api/v1/jobs/{id}/action
///
/// Take an action on the job. `cancel` is the only supported action:
/// it transitions any non-terminal job to `cancelled`. 409 when the job
/// already reached a terminal state, 404 when the id is unknown.
pub async fn post_action(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(input): Json<ActionRequest>,
) -> AppResult<impl IntoResponse> {
    match input.action.as_str() {
        "cancel" => cancel_job(&state, job_id).await,
        other => {
            Err(CoreError::Validation(format!("unsupported action: {other}")).into())
        }
    }
}

/// Cancel a job unless it already reached a terminal state.
///
/// The conditional update is the state machine's guard: zero modified rows
/// on an existing job means it was already completed or cancelled. An
/// in-flight agent is not interrupted; it observes the state on its own
/// next check.
async fn cancel_job(state: &AppState, job_id: Uuid) -> AppResult<StatusCode> {
    if JobRepo::find_by_id(&state.pool, job_id).await?.is_none() {
        return Err(CoreError::NotFound {
            entity: "job",
            id: job_id.to_string(),
        }
        .into());
    }

    let cancelled =
        JobRepo::update_state(&state.pool, job_id, &JobState::TERMINAL, JobState::Cancelled)
            .await?;

    if !cancelled {
        return Err(CoreError::Conflict(
            "the job is already completed or cancelled".into(),
        )
        .into());
    }

    tracing::info!(job_id = %job_id, "Job cancelled");

    Ok(StatusCode::NO_CONTENT)
}
