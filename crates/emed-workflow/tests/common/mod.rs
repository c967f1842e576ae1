#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use emed_client::payload::{AttendanceUpdate, MedicalRecordUpdate, NewAttendance};
use emed_client::{ApiError, BoxFuture, ClinicApi};
use emed_core::models::attendance::{Attendance, AttendanceStatus, AttendanceType};
use emed_core::models::medical_record::{Exam, MedicalRecord, Medicine};
use emed_core::models::patient::{
    Patient, PatientSummary, Professional, ProfessionalRole, ProfessionalSummary,
};
use emed_core::routes::Route;
use emed_core::schedule::FixedClock;
use emed_core::session::{Capabilities, SessionContext, SessionProfessional};
use emed_export::ExportedFile;
use emed_workflow::services::{Downloads, Navigator, Notification, Notifier, Printer, Services};

pub const NURSE_ID: u64 = 10;
pub const DOCTOR_ID: u64 = 20;
pub const OTHER_DOCTOR_ID: u64 = 21;

/// Friday, clinic time.
pub const NOW: &str = "2026-10-16T10:00:00-03:00[-03:00]";

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListAttendances,
    GetAttendance(u64),
    Create(NewAttendance),
    UpdateAttendance(AttendanceUpdate),
    UpdateRecord(MedicalRecordUpdate),
    ListPatients,
    ListProfessionals,
}

#[derive(Default)]
struct FakeState {
    calls: Vec<Call>,
    attendances: Vec<Attendance>,
    fail_status_update: Option<(u16, Option<String>)>,
    fail_record_update: bool,
    reject_token: bool,
}

/// In-memory backend that records every call.
#[derive(Clone, Default)]
pub struct FakeApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeApi {
    pub fn with_attendances(attendances: Vec<Attendance>) -> Self {
        let api = Self::default();
        api.state.lock().unwrap().attendances = attendances;
        api
    }

    pub fn fail_status_update(&self, status: u16, message: Option<&str>) {
        self.state.lock().unwrap().fail_status_update =
            Some((status, message.map(str::to_string)));
    }

    pub fn fail_record_update(&self) {
        self.state.lock().unwrap().fail_record_update = true;
    }

    pub fn clear_failures(&self) {
        let mut state = self.state.lock().unwrap();
        state.fail_status_update = None;
        state.fail_record_update = false;
    }

    pub fn reject_token(&self) {
        self.state.lock().unwrap().reject_token = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.reject_token {
            return Err(ApiError::Unauthenticated);
        }
        Ok(())
    }
}

impl ClinicApi for FakeApi {
    fn list_attendances(&self) -> BoxFuture<'_, Result<Vec<Attendance>, ApiError>> {
        Box::pin(async move {
            self.record(Call::ListAttendances)?;
            Ok(self.state.lock().unwrap().attendances.clone())
        })
    }

    fn get_attendance(&self, id: u64) -> BoxFuture<'_, Result<Attendance, ApiError>> {
        Box::pin(async move {
            self.record(Call::GetAttendance(id))?;
            self.state
                .lock()
                .unwrap()
                .attendances
                .iter()
                .find(|a| a.id == id)
                .cloned()
                .ok_or(ApiError::Rejected {
                    status: 404,
                    message: Some("Attendance not found".into()),
                })
        })
    }

    fn create_attendance(&self, attendance: NewAttendance) -> BoxFuture<'_, Result<(), ApiError>> {
        Box::pin(async move { self.record(Call::Create(attendance)) })
    }

    fn update_attendance(&self, update: AttendanceUpdate) -> BoxFuture<'_, Result<(), ApiError>> {
        Box::pin(async move {
            self.record(Call::UpdateAttendance(update.clone()))?;
            let mut state = self.state.lock().unwrap();
            if let Some((status, message)) = state.fail_status_update.clone() {
                return Err(ApiError::Rejected { status, message });
            }
            if let Some(a) = state.attendances.iter_mut().find(|a| a.id == update.id) {
                if let Some(status) = update.status {
                    a.status = status;
                }
                if let Some(date) = update.date {
                    a.date = date;
                }
                if let Some(reason) = update.cancellation_reason {
                    a.cancellation_reason = reason;
                }
            }
            Ok(())
        })
    }

    fn update_medical_record(
        &self,
        update: MedicalRecordUpdate,
    ) -> BoxFuture<'_, Result<(), ApiError>> {
        Box::pin(async move {
            self.record(Call::UpdateRecord(update))?;
            if self.state.lock().unwrap().fail_record_update {
                return Err(ApiError::Transport("connection reset".into()));
            }
            Ok(())
        })
    }

    fn list_patients(&self) -> BoxFuture<'_, Result<Vec<Patient>, ApiError>> {
        Box::pin(async move {
            self.record(Call::ListPatients)?;
            Ok(patients())
        })
    }

    fn list_professionals(&self) -> BoxFuture<'_, Result<Vec<Professional>, ApiError>> {
        Box::pin(async move {
            self.record(Call::ListProfessionals)?;
            Ok(professionals())
        })
    }
}

#[derive(Default)]
pub struct Recorder {
    pub notifications: Mutex<Vec<Notification>>,
    pub routes: Mutex<Vec<Route>>,
    pub printed: Mutex<Vec<ExportedFile>>,
    pub downloads: Mutex<Vec<ExportedFile>>,
}

impl Recorder {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Notifier for Recorder {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

impl Navigator for Recorder {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

impl Printer for Recorder {
    fn print(&self, document: ExportedFile) -> std::io::Result<()> {
        self.printed.lock().unwrap().push(document);
        Ok(())
    }
}

impl Downloads for Recorder {
    fn save(&self, file: ExportedFile) -> std::io::Result<()> {
        self.downloads.lock().unwrap().push(file);
        Ok(())
    }
}

pub fn services(recorder: &Arc<Recorder>) -> Services {
    Services {
        notifier: recorder.clone(),
        navigator: recorder.clone(),
        printer: recorder.clone(),
        downloads: recorder.clone(),
        clock: Arc::new(FixedClock(NOW.parse().unwrap())),
    }
}

pub fn doctor_session() -> SessionContext {
    SessionContext::new(
        Some(SessionProfessional {
            id: DOCTOR_ID,
            name: "Dr. Carla Mendes".into(),
            role: ProfessionalRole::Doctor,
        }),
        Capabilities::for_role(ProfessionalRole::Doctor),
    )
}

pub fn front_desk_session() -> SessionContext {
    SessionContext::new(None, Capabilities::front_desk())
}

pub fn patients() -> Vec<Patient> {
    vec![
        Patient {
            id: 1,
            name: "Ana Souza".into(),
        },
        Patient {
            id: 2,
            name: "Bruno Lima".into(),
        },
    ]
}

pub fn professionals() -> Vec<Professional> {
    vec![
        Professional {
            id: NURSE_ID,
            name: "Nurse Joana".into(),
            role: ProfessionalRole::Nurse,
        },
        Professional {
            id: DOCTOR_ID,
            name: "Dr. Carla Mendes".into(),
            role: ProfessionalRole::Doctor,
        },
        Professional {
            id: OTHER_DOCTOR_ID,
            name: "Dr. Paulo Reis".into(),
            role: ProfessionalRole::Doctor,
        },
    ]
}

pub fn attendance(id: u64, status: AttendanceStatus, professional_id: u64) -> Attendance {
    let role = if professional_id == NURSE_ID {
        ProfessionalRole::Nurse
    } else {
        ProfessionalRole::Doctor
    };
    Attendance {
        id,
        kind: if role == ProfessionalRole::Nurse {
            AttendanceType::Triage
        } else {
            AttendanceType::Consultation
        },
        status,
        date: "2026-10-19T17:30:00Z".parse().unwrap(),
        professional_id,
        patient_id: 1,
        cancellation_reason: None,
        patient: Some(PatientSummary {
            id: Some(1),
            name: "Ana Souza".into(),
        }),
        professional: Some(ProfessionalSummary {
            id: Some(professional_id),
            name: "Assigned".into(),
            role,
        }),
        medical_record: None,
    }
}

pub fn with_record(mut attendance: Attendance) -> Attendance {
    attendance.medical_record = Some(MedicalRecord {
        id: 500 + attendance.id,
        description: Some("Headache for three days".into()),
        weight: Some(70.0),
        height: Some(1.75),
        diastolic_pressure: Some(80.0),
        systolic_pressure: Some(120.0),
        temperature: Some(36.8),
        exams: vec![Exam {
            id: 1,
            name: "Hemogram".into(),
            description: Some("Complete blood count".into()),
        }],
        medicines: vec![Medicine {
            id: 1,
            name: "Amoxicillin".into(),
            concentration: Some("500 mg".into()),
            usage: Some("1 capsule every 8 hours for 7 days".into()),
            producer: None,
        }],
    });
    attendance
}
