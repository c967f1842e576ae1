use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::attendance::AttendanceType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Patient {
    pub id: u64,
    pub name: String,
}

/// Patient fields embedded in an attendance payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PatientSummary {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Professional {
    pub id: u64,
    pub name: String,
    pub role: ProfessionalRole,
}

/// Professional fields embedded in an attendance payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProfessionalSummary {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    pub role: ProfessionalRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum ProfessionalRole {
    Nurse,
    Doctor,
}

impl fmt::Display for ProfessionalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfessionalRole::Nurse => f.write_str("NURSE"),
            ProfessionalRole::Doctor => f.write_str("DOCTOR"),
        }
    }
}

/// Professionals that may be assigned an attendance of `kind`: nurses for
/// triage, doctors for everything else. Input order is preserved.
pub fn eligible_professionals(kind: AttendanceType, all: &[Professional]) -> Vec<&Professional> {
    let role = kind.required_role();
    all.iter().filter(|p| p.role == role).collect()
}
