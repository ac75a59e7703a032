use thiserror::Error;

/// Errors raised by the collaborator seams: session acquisition and
/// resource enumeration.
///
/// Display implementations never contain credential material. Transient
/// provider faults are not retried at this layer; retry and backoff belong
/// to the provider implementations themselves.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("session error: {0}")]
    Session(String),

    #[error("provider error: {0}")]
    Provider(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
