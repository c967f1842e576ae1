//! Attendance detail workflow: edit one medical record and drive the
//! attendance to DONE.

use std::sync::Arc;

use tracing::{debug, info};

use emed_client::ClinicApi;
use emed_client::payload::AttendanceUpdate;
use emed_core::CoreError;
use emed_core::bmi::Bmi;
use emed_core::models::attendance::{Attendance, AttendanceStatus};
use emed_core::models::medical_record::{Exam, Medicine};
use emed_core::routes::Route;
use emed_core::session::{Capability, SessionContext};
use emed_core::status::Transition;
use emed_export::prescription::{Prescription, prescription_docx};
use emed_export::styles::DocumentStyles;

use crate::error::WorkflowError;
use crate::form::MedicalRecordForm;
use crate::services::Services;

pub const RECORD_SAVED: &str = "Medical record successfully saved";

pub struct AttendanceDetail {
    api: Arc<dyn ClinicApi>,
    session: SessionContext,
    services: Services,
    attendance_id: u64,
    status: AttendanceStatus,
    patient_name: String,
    record_id: u64,
    exams: Vec<Exam>,
    medicines: Vec<Medicine>,
    form: MedicalRecordForm,
    styles: DocumentStyles,
    submitting: bool,
    /// DONE was committed by this workflow but the record write failed.
    record_pending: bool,
}

impl AttendanceDetail {
    /// Builds the workflow from a fully loaded attendance. The payload must
    /// carry the patient and the nested medical record.
    pub fn open(
        api: Arc<dyn ClinicApi>,
        session: SessionContext,
        services: Services,
        attendance_id: u64,
        attendance: Attendance,
    ) -> Result<Self, WorkflowError> {
        if attendance_id == 0 {
            return Err(CoreError::InvalidId(attendance_id).into());
        }
        if attendance.id != attendance_id {
            return Err(WorkflowError::NotFound(attendance_id));
        }
        let patient_name = attendance
            .patient
            .map(|p| p.name)
            .ok_or(WorkflowError::IncompleteAttendance("patient"))?;
        let record = attendance
            .medical_record
            .ok_or(WorkflowError::IncompleteAttendance("medical record"))?;

        debug!(attendance_id, record_id = record.id, "attendance detail opened");
        Ok(Self {
            api,
            session,
            services,
            attendance_id,
            status: attendance.status,
            patient_name,
            record_id: record.id,
            form: MedicalRecordForm::from_record(&record),
            exams: record.exams,
            medicines: record.medicines,
            styles: DocumentStyles::default(),
            submitting: false,
            record_pending: false,
        })
    }

    pub fn with_styles(mut self, styles: DocumentStyles) -> Self {
        self.styles = styles;
        self
    }

    pub fn attendance_id(&self) -> u64 {
        self.attendance_id
    }

    pub fn status(&self) -> AttendanceStatus {
        self.status
    }

    pub fn heading(&self) -> String {
        format!("Attendance of {}", self.patient_name)
    }

    pub fn exams(&self) -> &[Exam] {
        &self.exams
    }

    pub fn medicines(&self) -> &[Medicine] {
        &self.medicines
    }

    pub fn form(&self) -> &MedicalRecordForm {
        &self.form
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.form.set_description(description);
    }

    pub fn set_weight(&mut self, weight: Option<f64>) {
        self.form.set_weight(weight);
    }

    pub fn set_height(&mut self, height: Option<f64>) {
        self.form.set_height(height);
    }

    pub fn set_diastolic_pressure(&mut self, value: Option<f64>) {
        self.form.set_diastolic_pressure(value);
    }

    pub fn set_systolic_pressure(&mut self, value: Option<f64>) {
        self.form.set_systolic_pressure(value);
    }

    pub fn set_temperature(&mut self, value: Option<f64>) {
        self.form.set_temperature(value);
    }

    pub fn bmi(&self) -> Option<Bmi> {
        self.form.bmi()
    }

    /// A DONE attendance's record is read-only, unless this workflow
    /// finalized it and the record write has not gone through yet.
    pub fn is_locked(&self) -> bool {
        self.status == AttendanceStatus::Done && !self.record_pending
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn can_submit(&self) -> bool {
        !self.is_locked() && !self.submitting && self.form.is_valid()
    }

    /// Writes the record and returns to the listing.
    pub async fn save(&mut self) -> Result<(), WorkflowError> {
        self.ensure_submittable()?;
        self.submitting = true;
        let result = self.commit_record().await;
        self.submitting = false;
        self.finish("save", result)
    }

    /// Status first, then the record. A failed status commit leaves the
    /// record untouched; a retry after a failed record write only resends
    /// the record.
    pub async fn finalize(&mut self) -> Result<(), WorkflowError> {
        self.ensure_submittable()?;
        let next = if self.record_pending {
            None
        } else {
            Some(Transition::Finalize.check(self.status)?)
        };
        self.submitting = true;
        let result = self.commit_finalize(next).await;
        self.submitting = false;
        self.finish("finalize", result)
    }

    async fn commit_finalize(
        &mut self,
        next: Option<AttendanceStatus>,
    ) -> Result<(), WorkflowError> {
        if let Some(next) = next {
            self.api
                .update_attendance(AttendanceUpdate::status(self.attendance_id, next))
                .await?;
            info!(attendance_id = self.attendance_id, status = %next, "attendance finalized");
            self.status = next;
            self.record_pending = true;
        }
        self.commit_record().await
    }

    async fn commit_record(&mut self) -> Result<(), WorkflowError> {
        self.api
            .update_medical_record(self.form.to_update(self.record_id))
            .await?;
        self.record_pending = false;
        info!(
            attendance_id = self.attendance_id,
            record_id = self.record_id,
            "medical record saved"
        );
        Ok(())
    }

    fn finish(
        &self,
        action: &'static str,
        result: Result<(), WorkflowError>,
    ) -> Result<(), WorkflowError> {
        match result {
            Ok(()) => {
                self.services.notify_success(RECORD_SAVED);
                self.services.navigator.navigate(Route::Dashboard);
                Ok(())
            }
            Err(e) => {
                self.services.report(action, &e);
                Err(e)
            }
        }
    }

    fn ensure_submittable(&self) -> Result<(), WorkflowError> {
        if self.submitting {
            return Err(WorkflowError::Busy);
        }
        if self.is_locked() {
            return Err(WorkflowError::RecordLocked(self.attendance_id));
        }
        self.form.validate()?;
        Ok(())
    }

    pub fn print_exam(&self, index: usize) -> Result<(), WorkflowError> {
        self.require(Capability::ManagePrescriptions)?;
        let exam = self.exams.get(index).cloned().ok_or(WorkflowError::NoSuchLine {
            kind: "exam",
            index,
        })?;
        let today = self.services.clock.now().date();
        self.print(Prescription::for_exam(&self.patient_name, exam, today))
    }

    pub fn print_medicine(&self, index: usize) -> Result<(), WorkflowError> {
        self.require(Capability::ManagePrescriptions)?;
        let medicine = self
            .medicines
            .get(index)
            .cloned()
            .ok_or(WorkflowError::NoSuchLine {
                kind: "medicine",
                index,
            })?;
        let today = self.services.clock.now().date();
        self.print(Prescription::for_medicine(&self.patient_name, medicine, today))
    }

    fn print(&self, prescription: Prescription) -> Result<(), WorkflowError> {
        let prescription = match &self.session.professional {
            Some(p) => prescription.signed_by(p.name.as_str()),
            None => prescription,
        };
        let result = prescription_docx(&prescription, &self.styles)
            .map_err(WorkflowError::from)
            .and_then(|document| {
                let file_name = document.file_name.clone();
                self.services.printer.print(document)?;
                debug!(attendance_id = self.attendance_id, %file_name, "prescription sent to printer");
                Ok(())
            });
        if let Err(e) = &result {
            self.services.report("print", e);
        }
        result
    }

    pub fn open_prescriptions(&self) -> Result<(), WorkflowError> {
        self.require(Capability::ManagePrescriptions)?;
        self.services
            .navigator
            .navigate(Route::Prescriptions(self.attendance_id));
        Ok(())
    }

    /// Back to the listing; unsaved edits are dropped.
    pub fn cancel(self) {
        self.services.navigator.navigate(Route::Dashboard);
    }

    fn require(&self, capability: Capability) -> Result<(), WorkflowError> {
        if self.session.can(capability) {
            Ok(())
        } else {
            Err(WorkflowError::Forbidden(capability))
        }
    }
}
