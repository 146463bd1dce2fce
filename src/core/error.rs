use thiserror::Error;

use crate::models::{IdError, MatchId};
use crate::services::StoreError;

/// Errors surfaced by the matching core
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Discovery is blocked until the next calendar day
    #[error("Daily discovery limit of {limit} swipes reached")]
    QuotaExceeded { limit: usize },

    #[error("Persistence error: {0}")]
    Persistence(StoreError),

    /// The swipe was stored but one side of the room pair was not
    #[error("Match {match_id} was only partially created: {source}")]
    PartialMatchCreation { match_id: MatchId, source: StoreError },
}

impl CoreError {
    /// Short machine-readable code used in error responses
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::Validation(_) => "validation_error",
            CoreError::NotFound(_) => "not_found",
            CoreError::Forbidden(_) => "forbidden",
            CoreError::QuotaExceeded { .. } => "quota_exceeded",
            CoreError::Persistence(_) => "persistence_error",
            CoreError::PartialMatchCreation { .. } => "partial_match_creation",
        }
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => CoreError::NotFound(what),
            other => CoreError::Persistence(other),
        }
    }
}

impl From<IdError> for CoreError {
    fn from(err: IdError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CoreError::Validation(errors.to_string())
    }
}
