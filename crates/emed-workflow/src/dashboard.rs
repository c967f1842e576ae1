//! Dashboard workflow: the attendance listing and its row and modal
//! actions.
//!
//! The list is replaced wholesale from the server after every successful
//! write; rows are never patched locally.

use std::sync::Arc;

use tracing::{debug, info};

use emed_client::ClinicApi;
use emed_client::payload::AttendanceUpdate;
use emed_core::models::attendance::{Attendance, AttendanceStatus, AttendanceType};
use emed_core::models::patient::{Patient, Professional, ProfessionalRole};
use emed_core::routes::Route;
use emed_core::schedule::format_attendance_date;
use emed_core::session::{Capability, SessionContext};
use emed_core::status::{StatusColor, Transition, status_color};
use emed_export::ExportedFile;
use emed_export::spreadsheet::attendances_to_xlsx;

use crate::error::WorkflowError;
use crate::form::{CancelForm, CreateForm, RescheduleForm};
use crate::modal::{ConfirmationModal, SelectedAppointment};
use crate::services::Services;

pub const ATTENDANCE_CREATED: &str = "Attendance created!";
pub const ATTENDANCE_UPDATED: &str = "Attendance updated!";
pub const ATTENDANCE_CANCELED: &str = "Attendance canceled!";

/// Reason recorded when a patient is marked as a no-show.
pub const NOT_ATTENDED_REASON: &str = "Patient did not attend.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    Hidden,
    Disabled,
    Enabled,
}

impl ActionState {
    fn gate(visible: bool, enabled: bool) -> Self {
        match (visible, enabled) {
            (false, _) => ActionState::Hidden,
            (true, false) => ActionState::Disabled,
            (true, true) => ActionState::Enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        *self == ActionState::Enabled
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendIcon {
    Nurse,
    Doctor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowActions {
    pub attend: ActionState,
    pub attend_icon: AttendIcon,
    pub not_attended: ActionState,
    pub reschedule: ActionState,
    pub cancel: ActionState,
    pub medical_records: ActionState,
}

impl RowActions {
    pub fn for_row(session: &SessionContext, attendance: &Attendance) -> Self {
        let confirmed = attendance.status == AttendanceStatus::Confirmed;
        let attendable = matches!(
            attendance.status,
            AttendanceStatus::Confirmed | AttendanceStatus::InProgress
        );
        let schedules = session.can(Capability::ManageAppointments);
        let attends = session.can(Capability::ManageAttendances);

        let attend_icon = match attendance.professional_role() {
            Some(ProfessionalRole::Nurse) => AttendIcon::Nurse,
            _ if attendance.kind == AttendanceType::Triage => AttendIcon::Nurse,
            _ => AttendIcon::Doctor,
        };

        Self {
            attend: ActionState::gate(attends, attendable && session.is_assigned(attendance)),
            attend_icon,
            not_attended: ActionState::gate(schedules, confirmed),
            reschedule: ActionState::gate(schedules && confirmed, true),
            cancel: ActionState::gate(schedules && confirmed, true),
            medical_records: ActionState::Enabled,
        }
    }
}

/// One rendered row of the listing.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView<'a> {
    pub attendance: &'a Attendance,
    pub date_label: String,
    pub status_color: StatusColor,
    pub actions: RowActions,
}

/// A labelled choice in a select input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: u64,
    pub label: String,
}

pub struct Dashboard {
    api: Arc<dyn ClinicApi>,
    session: SessionContext,
    services: Services,
    attendances: Vec<Attendance>,
    patients: Vec<Patient>,
    professionals: Vec<Professional>,
    modal: ConfirmationModal,
    submitting: bool,
}

impl Dashboard {
    /// `initial` is the pre-fetched list from the page entry point.
    pub fn new(
        api: Arc<dyn ClinicApi>,
        session: SessionContext,
        services: Services,
        initial: Vec<Attendance>,
    ) -> Self {
        Self {
            api,
            session,
            services,
            attendances: initial,
            patients: Vec::new(),
            professionals: Vec::new(),
            modal: ConfirmationModal::closed(),
            submitting: false,
        }
    }

    pub fn attendances(&self) -> &[Attendance] {
        &self.attendances
    }

    pub fn rows(&self) -> Vec<RowView<'_>> {
        let tz = self.services.clock.now().time_zone().clone();
        self.attendances
            .iter()
            .map(|attendance| RowView {
                attendance,
                date_label: format_attendance_date(attendance.date, &tz),
                status_color: status_color(attendance.status),
                actions: RowActions::for_row(&self.session, attendance),
            })
            .collect()
    }

    pub fn modal(&self) -> &ConfirmationModal {
        &self.modal
    }

    /// The body bound to the open modal, for the UI to edit.
    pub fn form_mut(&mut self) -> &mut SelectedAppointment {
        self.modal.selected_mut()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Opens the create form, loading the patient and professional lookups
    /// first.
    pub async fn open_create(&mut self) -> Result<(), WorkflowError> {
        self.require(Capability::ManageAppointments)?;
        let result = self.load_lookups().await;
        if let Err(e) = result {
            self.services.report("open_create", &e);
            return Err(e);
        }
        self.modal = ConfirmationModal::open(SelectedAppointment::Create(CreateForm::default()));
        Ok(())
    }

    async fn load_lookups(&mut self) -> Result<(), WorkflowError> {
        let patients = self.api.list_patients().await?;
        let professionals = self.api.list_professionals().await?;
        debug!(
            patients = patients.len(),
            professionals = professionals.len(),
            "lookups loaded"
        );
        self.patients = patients;
        self.professionals = professionals;
        Ok(())
    }

    pub fn type_options(&self) -> Vec<AttendanceType> {
        AttendanceType::ALL.to_vec()
    }

    pub fn patient_options(&self) -> Vec<SelectOption> {
        self.patients
            .iter()
            .map(|p| SelectOption {
                value: p.id,
                label: p.name.clone(),
            })
            .collect()
    }

    /// Nurses for a triage form, doctors for any other or no type.
    pub fn professional_options(&self) -> Vec<SelectOption> {
        let role = match self.modal.selected() {
            SelectedAppointment::Create(form) => form.kind,
            _ => None,
        }
        .map_or(ProfessionalRole::Doctor, |kind| kind.required_role());

        self.professionals
            .iter()
            .filter(|p| p.role == role)
            .map(|p| SelectOption {
                value: p.id,
                label: p.name.clone(),
            })
            .collect()
    }

    /// Sets the create form's type, dropping a professional from the wrong
    /// pool.
    pub fn set_create_kind(&mut self, kind: AttendanceType) {
        if let SelectedAppointment::Create(form) = self.modal.selected_mut() {
            form.set_kind(kind, &self.professionals);
        }
    }

    pub fn open_reschedule(&mut self, id: u64) -> Result<(), WorkflowError> {
        self.require(Capability::ManageAppointments)?;
        let attendance = self.find(id)?;
        Transition::Reschedule.check(attendance.status)?;
        let form = RescheduleForm::from_attendance(attendance);
        self.modal = ConfirmationModal::open(SelectedAppointment::Reschedule(form));
        Ok(())
    }

    pub fn open_cancel(&mut self, id: u64) -> Result<(), WorkflowError> {
        self.require(Capability::ManageAppointments)?;
        let attendance = self.find(id)?;
        Transition::Cancel.check(attendance.status)?;
        let form = CancelForm::from_attendance(attendance);
        self.modal = ConfirmationModal::open(SelectedAppointment::Cancel(form));
        Ok(())
    }

    pub fn close_modal(&mut self) {
        self.modal.close();
    }

    /// Validates the bound form and sends its request. Invalid forms send
    /// nothing. On success the modal closes and the list is re-fetched once;
    /// on failure the modal stays open with the form as it was.
    pub async fn submit_modal(&mut self) -> Result<(), WorkflowError> {
        if self.submitting {
            return Err(WorkflowError::Busy);
        }
        let now = self.services.clock.now();
        let request = match self.modal.selected() {
            SelectedAppointment::None => return Err(WorkflowError::NothingToSubmit),
            SelectedAppointment::Create(form) => {
                Request::Create(form.validate(&now, &self.professionals, &self.patients)?)
            }
            SelectedAppointment::Reschedule(form) => {
                Request::Update(form.validate(&now)?, ATTENDANCE_UPDATED)
            }
            SelectedAppointment::Cancel(form) => {
                Request::Update(form.validate()?, ATTENDANCE_CANCELED)
            }
        };

        self.submitting = true;
        let result = match request {
            Request::Create(body) => {
                let kind = body.kind;
                self.api
                    .create_attendance(body)
                    .await
                    .map(|()| {
                        info!(%kind, "attendance created");
                        ATTENDANCE_CREATED
                    })
            }
            Request::Update(update, title) => {
                let id = update.id;
                let status = update.status;
                self.api.update_attendance(update).await.map(|()| {
                    info!(attendance_id = id, status = ?status, "attendance updated");
                    title
                })
            }
        };
        self.submitting = false;

        match result {
            Ok(title) => {
                self.services.notify_success(title);
                self.modal.close();
                self.refetch().await
            }
            Err(e) => {
                let e = WorkflowError::from(e);
                self.services.report("submit", &e);
                Err(e)
            }
        }
    }

    /// Moves a CONFIRMED row to INPROGRESS, then opens it. An INPROGRESS
    /// row is opened without a request.
    pub async fn attend(&mut self, id: u64) -> Result<(), WorkflowError> {
        self.require(Capability::ManageAttendances)?;
        let attendance = self.find(id)?;
        if !self.session.is_assigned(attendance) {
            return Err(WorkflowError::NotAssigned(id));
        }

        match attendance.status {
            AttendanceStatus::InProgress => {}
            status => {
                let next = Transition::Attend.check(status)?;
                if let Err(e) = self
                    .api
                    .update_attendance(AttendanceUpdate::status(id, next))
                    .await
                {
                    let e = WorkflowError::from(e);
                    self.services.report("attend", &e);
                    return Err(e);
                }
                info!(attendance_id = id, status = %next, "attendance started");
            }
        }

        self.services.navigator.navigate(Route::Attendance(id));
        Ok(())
    }

    pub async fn not_attended(&mut self, id: u64) -> Result<(), WorkflowError> {
        self.require(Capability::ManageAppointments)?;
        let attendance = self.find(id)?;
        Transition::NoShow.check(attendance.status)?;

        if let Err(e) = self
            .api
            .update_attendance(AttendanceUpdate::not_attended(id, NOT_ATTENDED_REASON))
            .await
        {
            let e = WorkflowError::from(e);
            self.services.report("not_attended", &e);
            return Err(e);
        }
        info!(attendance_id = id, "attendance marked not attended");
        self.services.notify_success(ATTENDANCE_UPDATED);
        self.refetch().await
    }

    pub fn open_medical_records(&self, id: u64) -> Result<(), WorkflowError> {
        let attendance = self.find(id)?;
        self.services
            .navigator
            .navigate(Route::PatientRecords(attendance.patient_id));
        Ok(())
    }

    /// Replaces the list with the server's and clears any selection.
    pub async fn refetch(&mut self) -> Result<(), WorkflowError> {
        match self.api.list_attendances().await {
            Ok(attendances) => {
                debug!(count = attendances.len(), "attendances re-fetched");
                self.attendances = attendances;
                self.modal.close();
                Ok(())
            }
            Err(e) => {
                let e = WorkflowError::from(e);
                self.services.report("refetch", &e);
                Err(e)
            }
        }
    }

    /// Spreadsheet of the list as currently loaded, handed to downloads.
    pub fn export(&self) -> Result<ExportedFile, WorkflowError> {
        let now = self.services.clock.now().timestamp();
        let result = attendances_to_xlsx(&self.attendances, now)
            .map_err(WorkflowError::from)
            .and_then(|file| {
                self.services.downloads.save(file.clone())?;
                Ok(file)
            });
        if let Err(e) = &result {
            self.services.report("export", e);
        }
        result
    }

    fn find(&self, id: u64) -> Result<&Attendance, WorkflowError> {
        self.attendances
            .iter()
            .find(|a| a.id == id)
            .ok_or(WorkflowError::NotFound(id))
    }

    fn require(&self, capability: Capability) -> Result<(), WorkflowError> {
        if self.session.can(capability) {
            Ok(())
        } else {
            Err(WorkflowError::Forbidden(capability))
        }
    }
}

enum Request {
    Create(emed_client::payload::NewAttendance),
    Update(AttendanceUpdate, &'static str),
}
