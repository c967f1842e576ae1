use std::fmt;

use thiserror::Error;

use emed_client::ApiError;
use emed_core::CoreError;
use emed_core::session::Capability;
use emed_export::ExportError;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("medical record of attendance {0} can no longer be edited")]
    RecordLocked(u64),

    #[error("missing capability: {0}")]
    Forbidden(Capability),

    #[error("attendance {0} is not assigned to the current professional")]
    NotAssigned(u64),

    #[error("attendance {0} is not in the current list")]
    NotFound(u64),

    #[error("no {kind} at position {index}")]
    NoSuchLine { kind: &'static str, index: usize },

    #[error("attendance payload is missing {0}")]
    IncompleteAttendance(&'static str),

    #[error("a submission is already in flight")]
    Busy,

    #[error("no action is bound to the modal")]
    NothingToSubmit,

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("delivery failed: {0}")]
    Delivery(#[from] std::io::Error),
}

impl From<ValidationErrors> for WorkflowError {
    fn from(e: ValidationErrors) -> Self {
        WorkflowError::Validation(e)
    }
}

/// One failed form rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All failed rules of a form, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// `Ok(())` when no rule failed.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}
