use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::medical_record::MedicalRecord;
use super::patient::{PatientSummary, ProfessionalRole, ProfessionalSummary};

/// A single clinical visit.
///
/// The list endpoint returns attendances without the nested medical record;
/// the single-resource endpoint includes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Attendance {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: AttendanceType,
    pub status: AttendanceStatus,
    pub date: jiff::Timestamp,
    pub professional_id: u64,
    pub patient_id: u64,
    #[serde(default)]
    pub cancellation_reason: Option<String>,
    #[serde(default)]
    pub patient: Option<PatientSummary>,
    #[serde(default)]
    pub professional: Option<ProfessionalSummary>,
    #[serde(default)]
    pub medical_record: Option<MedicalRecord>,
}

impl Attendance {
    pub fn patient_name(&self) -> Option<&str> {
        self.patient.as_ref().map(|p| p.name.as_str())
    }

    /// Role of the assigned professional, when the summary was embedded.
    pub fn professional_role(&self) -> Option<ProfessionalRole> {
        self.professional.as_ref().map(|p| p.role)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum AttendanceType {
    Triage,
    Consultation,
}

impl AttendanceType {
    pub const ALL: [AttendanceType; 2] = [AttendanceType::Triage, AttendanceType::Consultation];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceType::Triage => "TRIAGE",
            AttendanceType::Consultation => "CONSULTATION",
        }
    }

    /// The professional role eligible to be assigned an attendance of this type.
    pub fn required_role(&self) -> ProfessionalRole {
        match self {
            AttendanceType::Triage => ProfessionalRole::Nurse,
            _ => ProfessionalRole::Doctor,
        }
    }
}

impl fmt::Display for AttendanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AttendanceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttendanceType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown attendance type: {s}"))
    }
}

/// Lifecycle status of an attendance. The backend spells the in-progress
/// state `INPROGRESS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum AttendanceStatus {
    #[serde(rename = "CONFIRMED")]
    Confirmed,
    #[serde(rename = "INPROGRESS", alias = "IN_PROGRESS")]
    InProgress,
    #[serde(rename = "DONE")]
    Done,
    #[serde(rename = "NOTATTENDED")]
    NotAttended,
    #[serde(rename = "CANCELED")]
    Canceled,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Confirmed => "CONFIRMED",
            AttendanceStatus::InProgress => "INPROGRESS",
            AttendanceStatus::Done => "DONE",
            AttendanceStatus::NotAttended => "NOTATTENDED",
            AttendanceStatus::Canceled => "CANCELED",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
