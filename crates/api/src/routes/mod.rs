pub mod advertisement;
pub mod health;
pub mod jobs;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /jobs                       submit (POST)
/// /jobs/claim                 claim next waiting job (POST)
/// /jobs/{id}                  job definition (GET)
/// /jobs/{id}/position         place in the waiting set (GET)
/// /jobs/{id}/action           cancel (POST)
/// /jobs/{id}/result           result namespace (GET, POST)
/// /jobs/{id}/artifact         bundle download/upload (GET, POST)
/// /jobs/{id}/output           streamed output (GET drains, POST appends)
///
/// /queues                     queue advertisement (GET, POST)
/// /queues/{name}/images       image maps (GET)
/// /queues/images              image maps (POST)
/// /agents                     agent registry (GET)
/// /agents/{name}              agent registry upsert (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/jobs", jobs::router())
        .merge(advertisement::router())
}
