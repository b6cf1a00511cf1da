//! Route definitions for the `/jobs` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{artifacts, jobs, output, results};
use crate::state::AppState;

/// Routes mounted at `/jobs`.
///
/// ```text
/// POST   /                 -> submit_job
/// POST   /claim            -> claim_job
/// GET    /{id}             -> get_job
/// GET    /{id}/position    -> get_position
/// POST   /{id}/action      -> post_action
/// GET    /{id}/result      -> get_result
/// POST   /{id}/result      -> post_result
/// GET    /{id}/artifact    -> get_artifact
/// POST   /{id}/artifact    -> post_artifact
/// GET    /{id}/output      -> get_output
/// POST   /{id}/output      -> post_output
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(jobs::submit_job))
        .route("/claim", post(jobs::claim_job))
        .route("/{id}", get(jobs::get_job))
        .route("/{id}/position", get(jobs::get_position))
        .route("/{id}/action", post(jobs::post_action))
        .route("/{id}/result", get(results::get_result).post(results::post_result))
        .route(
            "/{id}/artifact",
            get(artifacts::get_artifact).post(artifacts::post_artifact),
        )
        .route("/{id}/output", get(output::get_output).post(output::post_output))
}
