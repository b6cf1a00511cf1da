//! Handlers for artifact bundle upload and download.

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use benchline_db::repositories::ArtifactRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Download filename served for every bundle.
const ARTIFACT_DOWNLOAD_NAME: &str = "artifact.tar.gz";

/// POST /api/v1/jobs/{id}/artifact
///
/// Store a new version of the job's artifact bundle from the multipart
/// `file` field. Earlier versions are kept; readers only ever see the
/// newest one.
pub async fn post_artifact(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut file_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            file_data = Some(data.to_vec());
        }
        // Other fields are ignored.
    }

    let data =
        file_data.ok_or_else(|| AppError::BadRequest("missing multipart field: file".into()))?;

    ArtifactRepo::put(&state.pool, job_id, &data).await?;

    tracing::info!(job_id = %job_id, bytes = data.len(), "Artifact stored");

    Ok(StatusCode::OK)
}

/// GET /api/v1/jobs/{id}/artifact
///
/// The latest uploaded bundle as a byte stream, 204 when the job has no
/// artifact yet.
pub async fn get_artifact(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> AppResult<Response> {
    match ArtifactRepo::get(&state.pool, job_id).await? {
        Some(bytes) => Ok((
            [
                (header::CONTENT_TYPE, "application/octet-stream".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{ARTIFACT_DOWNLOAD_NAME}\""),
                ),
            ],
            bytes,
        )
            .into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
