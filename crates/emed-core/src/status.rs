//! Attendance status lifecycle.
//!
//! ```text
//! CONFIRMED ──attend──▶ INPROGRESS ──finalize──▶ DONE
//!     │ ▲
//!     │ └─reschedule (date only)
//!     ├──cancel (reason required)──▶ CANCELED
//!     └──no-show──▶ NOTATTENDED
//! ```
//!
//! DONE, NOTATTENDED and CANCELED are terminal. The server is the source of
//! truth; the client mirrors these rules so that it never issues a request
//! for a transition the lifecycle does not define.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::models::attendance::AttendanceStatus;

impl AttendanceStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AttendanceStatus::Done | AttendanceStatus::NotAttended | AttendanceStatus::Canceled
        )
    }

    pub fn can_transition_to(&self, next: AttendanceStatus) -> bool {
        use AttendanceStatus::*;
        matches!(
            (self, next),
            (Confirmed, InProgress)
                | (Confirmed, Confirmed)
                | (Confirmed, Canceled)
                | (Confirmed, NotAttended)
                | (InProgress, Done)
        )
    }
}

/// The named moves of the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Attend,
    Finalize,
    Reschedule,
    Cancel,
    NoShow,
}

impl Transition {
    pub fn from(&self) -> AttendanceStatus {
        match self {
            Transition::Finalize => AttendanceStatus::InProgress,
            _ => AttendanceStatus::Confirmed,
        }
    }

    pub fn to(&self) -> AttendanceStatus {
        match self {
            Transition::Attend => AttendanceStatus::InProgress,
            Transition::Finalize => AttendanceStatus::Done,
            Transition::Reschedule => AttendanceStatus::Confirmed,
            Transition::Cancel => AttendanceStatus::Canceled,
            Transition::NoShow => AttendanceStatus::NotAttended,
        }
    }

    /// Returns the target status if the move is legal from `current`.
    pub fn check(&self, current: AttendanceStatus) -> Result<AttendanceStatus, CoreError> {
        if current == self.from() && current.can_transition_to(self.to()) {
            Ok(self.to())
        } else {
            Err(CoreError::InvalidTransition {
                from: current,
                to: self.to(),
            })
        }
    }
}

/// Display color of a status tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum StatusColor {
    Warning,
    Success,
    Neutral,
    Danger,
}

impl StatusColor {
    /// The color-scheme name the UI kit expects.
    pub fn scheme(&self) -> &'static str {
        match self {
            StatusColor::Warning => "yellow",
            StatusColor::Success => "green",
            StatusColor::Neutral => "gray",
            StatusColor::Danger => "red",
        }
    }
}

pub fn status_color(status: AttendanceStatus) -> StatusColor {
    match status {
        AttendanceStatus::InProgress => StatusColor::Warning,
        AttendanceStatus::Confirmed => StatusColor::Success,
        AttendanceStatus::Done => StatusColor::Neutral,
        _ => StatusColor::Danger,
    }
}
