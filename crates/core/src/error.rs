/// Domain-level error type shared across crates.
///
/// Maps onto the three caller-visible failure classes: a missing resource,
/// a request that fails validation before touching storage, and a legal
/// request that conflicts with current state (e.g. cancelling a job that
/// already reached a terminal state). `Internal` covers everything the
/// caller cannot act on.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}
