//! Request handlers.
//!
//! Each submodule provides async handler functions for one slice of the
//! surface. Handlers delegate to the repositories in `benchline_db` and
//! map errors via [`crate::error::AppError`].

pub mod advertisement;
pub mod artifacts;
pub mod jobs;
pub mod output;
pub mod results;
