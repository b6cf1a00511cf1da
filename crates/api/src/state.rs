use std::sync::Arc;

use benchline_core::metrics::DispatchMetrics;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: benchline_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Submission/reservation observer, injected rather than global.
    pub metrics: Arc<dyn DispatchMetrics>,
}
