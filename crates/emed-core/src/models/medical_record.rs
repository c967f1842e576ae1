use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Clinical data attached to exactly one attendance.
///
/// Vitals are optional until a clinician records them. BMI is not stored
/// here: it is derived from `weight` and `height` whenever it is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MedicalRecord {
    pub id: u64,
    #[serde(default)]
    pub description: Option<String>,
    /// Kilograms.
    #[serde(default)]
    pub weight: Option<f64>,
    /// Meters.
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub diastolic_pressure: Option<f64>,
    #[serde(default)]
    pub systolic_pressure: Option<f64>,
    /// Degrees Celsius.
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub exams: Vec<Exam>,
    #[serde(default)]
    pub medicines: Vec<Medicine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Exam {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Medicine {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub concentration: Option<String>,
    #[serde(default)]
    pub usage: Option<String>,
    #[serde(default)]
    pub producer: Option<String>,
}
