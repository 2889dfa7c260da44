//! Shared error types for the services crate.

use thiserror::Error;

use sight_core::model::SessionSummaryError;

/// Errors emitted by session tracking.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no session is in progress")]
    NotStarted,
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
}
