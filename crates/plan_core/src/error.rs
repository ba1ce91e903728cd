use thiserror::Error;

use crate::backend::Collection;

pub type Result<T, E = PlannerError> = std::result::Result<T, E>;

/// Failures surfaced at the backend boundary. The pure engine never produces these.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("no signed-in user")]
    Unauthenticated,

    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: &'static str,
    },

    #[error("{collection} record `{id}` not found")]
    NotFound { collection: Collection, id: String },

    #[error("unable to decode backend record: {0}")]
    Decode(#[from] serde_json::Error),
}

impl PlannerError {
    pub fn backend(reason: impl std::fmt::Display) -> Self {
        Self::BackendUnavailable(reason.to_string())
    }

    pub fn is_backend(&self) -> bool {
        matches!(self, Self::BackendUnavailable(_))
    }
}
