//! Handlers for the job result namespace.
//!
//! Results are an arbitrary key/value map merged last-writer-wins per
//! field. The one rule: the reserved `job_state` key belongs to the state
//! machine and cannot be set through this surface.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use benchline_core::error::CoreError;
use benchline_db::models::state::RESERVED_RESULT_KEY;
use benchline_db::repositories::JobRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/jobs/{id}/result
///
/// Merge free-form result fields into the job's result namespace.
/// 400 when the map carries the reserved state key, 404 for an unknown job.
pub async fn post_result(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    Json(fields): Json<serde_json::Value>,
) -> AppResult<impl IntoResponse> {
    let map = fields
        .as_object()
        .ok_or_else(|| CoreError::Validation("result fields must be a JSON object".into()))?;

    if map.contains_key(RESERVED_RESULT_KEY) {
        return Err(CoreError::Validation(format!(
            "{RESERVED_RESULT_KEY} cannot be set through result updates"
        ))
        .into());
    }

    let updated = JobRepo::set_result_fields(&state.pool, job_id, &fields).await?;
    if !updated {
        return Err(CoreError::NotFound {
            entity: "job",
            id: job_id.to_string(),
        }
        .into());
    }

    Ok(StatusCode::OK)
}

/// GET /api/v1/jobs/{id}/result
///
/// The job's result namespace, including the lifecycle state under its
/// reserved key. 204 when the id is unknown.
pub async fn get_result(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> AppResult<Response> {
    match JobRepo::get_result_fields(&state.pool, job_id).await? {
        Some(fields) => Ok(Json(DataResponse { data: fields }).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
