//! Route definitions for queue advertisement and the agent registry.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::advertisement;
use crate::state::AppState;

/// Routes mounted at the API root.
///
/// ```text
/// GET    /queues                  -> list_queues
/// POST   /queues                  -> advertise_queues
/// GET    /queues/{name}/images    -> get_queue_images
/// POST   /queues/images           -> advertise_images
/// GET    /agents                  -> list_agents
/// POST   /agents/{name}           -> update_agent
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/queues",
            get(advertisement::list_queues).post(advertisement::advertise_queues),
        )
        .route("/queues/{name}/images", get(advertisement::get_queue_images))
        .route("/queues/images", post(advertisement::advertise_images))
        .route("/agents", get(advertisement::list_agents))
        .route("/agents/{name}", post(advertisement::update_agent))
}
