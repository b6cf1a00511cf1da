//! Handlers for streamed job output.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use benchline_db::repositories::OutputRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// POST /api/v1/jobs/{id}/output
///
/// Append the raw text body to the job's output buffer.
pub async fn post_output(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    body: String,
) -> AppResult<impl IntoResponse> {
    OutputRepo::append(&state.pool, job_id, &body, state.config.output_buffer_chunks).await?;
    Ok(StatusCode::OK)
}

/// GET /api/v1/jobs/{id}/output
///
/// Drain the buffer: the read returns everything appended since the last
/// poll and deletes it, so each chunk is delivered at most once.
/// 204 when nothing is pending.
pub async fn get_output(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> AppResult<Response> {
    match OutputRepo::drain(&state.pool, job_id).await? {
        Some(text) => Ok(text.into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
