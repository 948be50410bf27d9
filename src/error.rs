use thiserror::Error;

/// Errors raised by the engine's public operations.
///
/// Every failure is a precondition violation detected before any computation
/// starts, so there is no retryable category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid argument: {field} - {reason}")]
    InvalidArgument { field: String, reason: String },
}

impl EngineError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending input field.
    pub fn field(&self) -> &str {
        match self {
            EngineError::InvalidArgument { field, .. } => field,
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
