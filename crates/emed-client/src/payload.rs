//! Request bodies for the mutating endpoints.

use serde::Serialize;

use emed_core::models::attendance::{AttendanceStatus, AttendanceType};

/// Body of `POST /attendances`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAttendance {
    #[serde(rename = "type")]
    pub kind: AttendanceType,
    pub professional_id: u64,
    pub patient_id: u64,
    pub date: jiff::Timestamp,
}

/// Body of `PUT /attendances/:id`. Absent fields are left untouched by the
/// server; `cancellation_reason: Some(None)` clears the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceUpdate {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AttendanceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<jiff::Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<Option<String>>,
}

impl AttendanceUpdate {
    pub fn status(id: u64, status: AttendanceStatus) -> Self {
        Self {
            id,
            status: Some(status),
            date: None,
            cancellation_reason: None,
        }
    }

    /// New date, same status, no cancellation reason.
    pub fn reschedule(id: u64, date: jiff::Timestamp, status: AttendanceStatus) -> Self {
        Self {
            id,
            status: Some(status),
            date: Some(date),
            cancellation_reason: Some(None),
        }
    }

    pub fn cancel(id: u64, reason: impl Into<String>) -> Self {
        Self {
            id,
            status: Some(AttendanceStatus::Canceled),
            date: None,
            cancellation_reason: Some(Some(reason.into())),
        }
    }

    pub fn not_attended(id: u64, reason: impl Into<String>) -> Self {
        Self {
            id,
            status: Some(AttendanceStatus::NotAttended),
            date: None,
            cancellation_reason: Some(Some(reason.into())),
        }
    }
}

/// Body of `PUT /records/:id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecordUpdate {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diastolic_pressure: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub systolic_pressure: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}
