//! Handlers for queue advertisement and the agent registry.
//!
//! Agents advertise the queues they service (with optional per-queue image
//! maps) and keep their own registry records fresh. All writes are
//! upserts; none of this affects dispatch correctness.

use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use benchline_db::models::agent::AgentUpdate;
use benchline_db::repositories::{AgentRepo, QueueRepo};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Queues
// ---------------------------------------------------------------------------

/// GET /api/v1/queues
///
/// All advertised queues as a name -> description map.
pub async fn list_queues(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let queues = QueueRepo::list(&state.pool).await?;

    let map: HashMap<String, String> = queues
        .into_iter()
        .map(|q| (q.name, q.description))
        .collect();

    Ok(Json(DataResponse { data: map }))
}

/// POST /api/v1/queues
///
/// Advertise queue names with descriptions so producers can discover
/// which queues are valid to target.
pub async fn advertise_queues(
    State(state): State<AppState>,
    Json(input): Json<HashMap<String, String>>,
) -> AppResult<impl IntoResponse> {
    for (name, description) in &input {
        QueueRepo::upsert(&state.pool, name, description).await?;
    }
    Ok(StatusCode::OK)
}

/// GET /api/v1/queues/{name}/images
///
/// Known images for a queue. An unknown queue yields an empty map rather
/// than an error.
pub async fn get_queue_images(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let images = QueueRepo::images(&state.pool, &name)
        .await?
        .unwrap_or_else(|| json!({}));

    Ok(Json(DataResponse { data: images }))
}

/// POST /api/v1/queues/images
///
/// Replace the advertised image maps, one queue per top-level key.
pub async fn advertise_images(
    State(state): State<AppState>,
    Json(input): Json<HashMap<String, serde_json::Value>>,
) -> AppResult<impl IntoResponse> {
    for (queue, images) in &input {
        QueueRepo::set_images(&state.pool, queue, images).await?;
    }
    Ok(StatusCode::OK)
}

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

/// GET /api/v1/agents
///
/// All agent registry records, logs excluded.
pub async fn list_agents(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let agents = AgentRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: agents }))
}

/// POST /api/v1/agents/{name}
///
/// Upsert an agent's registry record. Log lines are appended and capped;
/// absent fields keep their stored values.
pub async fn update_agent(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(input): Json<AgentUpdate>,
) -> AppResult<impl IntoResponse> {
    AgentRepo::upsert(&state.pool, &name, &input).await?;

    tracing::debug!(agent = %name, "Agent record updated");

    Ok(StatusCode::OK)
}
