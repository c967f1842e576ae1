use thiserror::Error;

use crate::models::attendance::AttendanceStatus;
use crate::schedule::SlotError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: AttendanceStatus,
        to: AttendanceStatus,
    },

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid appointment slot: {0}")]
    InvalidSlot(#[from] SlotError),

    #[error("invalid attendance id: {0}")]
    InvalidId(u64),
}
