//! Form state and validation for the detail and dashboard workflows.
//!
//! Each form validates into the request body it submits, so a body can only
//! be built from a form that passed its rules.

use jiff::Zoned;

use emed_client::payload::{AttendanceUpdate, MedicalRecordUpdate, NewAttendance};
use emed_core::bmi::{self, Bmi};
use emed_core::models::attendance::{Attendance, AttendanceStatus, AttendanceType};
use emed_core::models::medical_record::MedicalRecord;
use emed_core::models::patient::{Patient, Professional};
use emed_core::schedule::validate_slot;

use crate::error::ValidationErrors;

pub const DESCRIPTION_REQUIRED: &str = "Description is required";
pub const DATE_REQUIRED: &str = "Date is required";
pub const TYPE_REQUIRED: &str = "Attendance type is required";
pub const PROFESSIONAL_REQUIRED: &str = "Professional is required";
pub const PATIENT_REQUIRED: &str = "Patient is required";
pub const REASON_REQUIRED: &str = "A reason to cancel an attendance is required";

/// Editable vitals of one medical record. BMI is derived, never set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MedicalRecordForm {
    description: Option<String>,
    weight: Option<f64>,
    height: Option<f64>,
    diastolic_pressure: Option<f64>,
    systolic_pressure: Option<f64>,
    temperature: Option<f64>,
    bmi: Option<Bmi>,
}

impl MedicalRecordForm {
    pub fn from_record(record: &MedicalRecord) -> Self {
        Self {
            description: record.description.clone(),
            weight: record.weight,
            height: record.height,
            diastolic_pressure: record.diastolic_pressure,
            systolic_pressure: record.systolic_pressure,
            temperature: record.temperature,
            bmi: bmi::calculate(record.weight, record.height),
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn weight(&self) -> Option<f64> {
        self.weight
    }

    pub fn height(&self) -> Option<f64> {
        self.height
    }

    pub fn diastolic_pressure(&self) -> Option<f64> {
        self.diastolic_pressure
    }

    pub fn systolic_pressure(&self) -> Option<f64> {
        self.systolic_pressure
    }

    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    pub fn bmi(&self) -> Option<Bmi> {
        self.bmi
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    pub fn set_weight(&mut self, weight: Option<f64>) {
        self.weight = weight;
        self.bmi = bmi::calculate(self.weight, self.height);
    }

    /// Height in meters.
    pub fn set_height(&mut self, height: Option<f64>) {
        self.height = height;
        self.bmi = bmi::calculate(self.weight, self.height);
    }

    pub fn set_diastolic_pressure(&mut self, value: Option<f64>) {
        self.diastolic_pressure = value;
    }

    pub fn set_systolic_pressure(&mut self, value: Option<f64>) {
        self.systolic_pressure = value;
    }

    pub fn set_temperature(&mut self, value: Option<f64>) {
        self.temperature = value;
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self
            .description
            .as_deref()
            .is_none_or(|d| d.trim().is_empty())
        {
            errors.push("description", DESCRIPTION_REQUIRED);
        }
        for (field, label, value) in [
            ("weight", "Weight", self.weight),
            ("height", "Height", self.height),
            ("diastolicPressure", "Diastolic pressure", self.diastolic_pressure),
            ("systolicPressure", "Systolic pressure", self.systolic_pressure),
            ("temperature", "Temperature", self.temperature),
        ] {
            if value.is_some_and(|v| !v.is_finite() || v <= 0.0) {
                errors.push(field, format!("{label} must be a positive number"));
            }
        }
        errors.into_result()
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn to_update(&self, record_id: u64) -> MedicalRecordUpdate {
        MedicalRecordUpdate {
            id: record_id,
            description: self.description.clone(),
            weight: self.weight,
            height: self.height,
            bmi: self.bmi.map(|b| b.value),
            diastolic_pressure: self.diastolic_pressure,
            systolic_pressure: self.systolic_pressure,
            temperature: self.temperature,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateForm {
    pub kind: Option<AttendanceType>,
    pub professional_id: Option<u64>,
    pub patient_id: Option<u64>,
    pub date: Option<Zoned>,
}

impl CreateForm {
    /// Changing the type drops a professional chosen from the other pool.
    pub fn set_kind(&mut self, kind: AttendanceType, professionals: &[Professional]) {
        self.kind = Some(kind);
        let still_eligible = self.professional_id.is_some_and(|id| {
            professionals
                .iter()
                .any(|p| p.id == id && p.role == kind.required_role())
        });
        if !still_eligible {
            self.professional_id = None;
        }
    }

    pub fn validate(
        &self,
        now: &Zoned,
        professionals: &[Professional],
        patients: &[Patient],
    ) -> Result<NewAttendance, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let date = check_date(self.date.as_ref(), now, &mut errors);

        if self.kind.is_none() {
            errors.push("type", TYPE_REQUIRED);
        }

        match (self.professional_id, self.kind) {
            (None, _) => errors.push("professionalId", PROFESSIONAL_REQUIRED),
            (Some(id), kind) => match professionals.iter().find(|p| p.id == id) {
                None => errors.push("professionalId", PROFESSIONAL_REQUIRED),
                Some(p) => match kind {
                    Some(kind) if p.role != kind.required_role() => errors.push(
                        "professionalId",
                        format!("A {kind} attendance needs a {}", kind.required_role()),
                    ),
                    _ => {}
                },
            },
        }

        let patient_known = self
            .patient_id
            .is_some_and(|id| patients.iter().any(|p| p.id == id));
        if !patient_known {
            errors.push("patientId", PATIENT_REQUIRED);
        }

        match (date, self.kind, self.professional_id, self.patient_id) {
            (Some(date), Some(kind), Some(professional_id), Some(patient_id))
                if errors.is_empty() =>
            {
                Ok(NewAttendance {
                    kind,
                    professional_id,
                    patient_id,
                    date,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Reschedule keeps the row's status and only replaces the date.
#[derive(Debug, Clone, PartialEq)]
pub struct RescheduleForm {
    pub attendance_id: u64,
    pub patient_name: Option<String>,
    pub status: AttendanceStatus,
    pub date: Option<Zoned>,
}

impl RescheduleForm {
    /// Pre-populated from the row, with the date cleared.
    pub fn from_attendance(attendance: &Attendance) -> Self {
        Self {
            attendance_id: attendance.id,
            patient_name: attendance.patient_name().map(str::to_string),
            status: attendance.status,
            date: None,
        }
    }

    pub fn validate(&self, now: &Zoned) -> Result<AttendanceUpdate, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        match check_date(self.date.as_ref(), now, &mut errors) {
            Some(date) => Ok(AttendanceUpdate::reschedule(
                self.attendance_id,
                date,
                self.status,
            )),
            None => Err(errors),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CancelForm {
    pub attendance_id: u64,
    pub patient_name: Option<String>,
    pub reason: String,
}

impl CancelForm {
    pub fn from_attendance(attendance: &Attendance) -> Self {
        Self {
            attendance_id: attendance.id,
            patient_name: attendance.patient_name().map(str::to_string),
            reason: String::new(),
        }
    }

    pub fn validate(&self) -> Result<AttendanceUpdate, ValidationErrors> {
        let reason = self.reason.trim();
        if reason.is_empty() {
            let mut errors = ValidationErrors::new();
            errors.push("cancellationReason", REASON_REQUIRED);
            return Err(errors);
        }
        Ok(AttendanceUpdate::cancel(self.attendance_id, reason))
    }
}

fn check_date(
    date: Option<&Zoned>,
    now: &Zoned,
    errors: &mut ValidationErrors,
) -> Option<jiff::Timestamp> {
    let Some(date) = date else {
        errors.push("date", DATE_REQUIRED);
        return None;
    };
    match validate_slot(date, now) {
        Ok(()) => Some(date.timestamp()),
        Err(e) => {
            errors.push("date", e.to_string());
            None
        }
    }
}
