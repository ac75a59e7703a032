use custos_core::CoreError;
use thiserror::Error;

/// Single error enum for policy loading, validation, and evaluation.
///
/// Validation-time errors (`Validation`, `Load`, `UnknownResourceType`,
/// `Deserialization`) are fatal to policy load: an invalid policy never
/// reaches execution. `Core` wraps poll-time session/provider failures,
/// which propagate to the evaluation loop uncaught.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("policy validation error: {0}")]
    Validation(String),

    #[error("policy load error: {0}")]
    Load(String),

    #[error("unknown resource type '{0}'")]
    UnknownResourceType(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

impl From<serde_json::Error> for PolicyError {
    fn from(e: serde_json::Error) -> Self {
        PolicyError::Deserialization(e.to_string())
    }
}

pub type PolicyResult<T> = Result<T, PolicyError>;
