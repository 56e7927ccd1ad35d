use crate::store::StoreError;

/// Caller-supplied data violates a form or lifecycle constraint. Never reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("`{field}` is required")]
    MissingField { field: &'static str },
    #[error("unknown status '{value}'")]
    UnknownStatus { value: String },
    #[error("cannot move from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

impl ValidationError {
    /// Offending form field, when the error is tied to one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::MissingField { field } => Some(field),
            ValidationError::UnknownStatus { .. } | ValidationError::InvalidTransition { .. } => {
                Some("status")
            }
        }
    }
}

/// Error raised by the submission services.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
