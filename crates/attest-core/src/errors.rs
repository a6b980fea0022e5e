use thiserror::Error;

/// Failure taxonomy for the validation pipeline. Every variant corresponds
/// to a terminal status transition on the evidence item (except `NotFound`
/// and `InvalidInput`, which are rejected before any state changes).
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("evidence item not found: {0}")]
    NotFound(String),

    #[error("storage failure: {detail}")]
    Storage { detail: String },

    #[error("inference failed ({model}): {detail}")]
    Inference { detail: String, model: String },

    #[error("persistence failure: {detail}")]
    Persistence { detail: String },

    #[error("invalid input: {detail}")]
    InvalidInput { detail: String },
}

impl ValidateError {
    pub fn storage(e: impl std::fmt::Display) -> Self {
        ValidateError::Storage {
            detail: e.to_string(),
        }
    }

    pub fn persistence(e: impl std::fmt::Display) -> Self {
        ValidateError::Persistence {
            detail: e.to_string(),
        }
    }

    pub fn invalid(detail: impl Into<String>) -> Self {
        ValidateError::InvalidInput {
            detail: detail.into(),
        }
    }
}
