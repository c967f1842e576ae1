use std::future::Future;
use std::pin::Pin;

use emed_core::models::attendance::Attendance;
use emed_core::models::patient::{Patient, Professional};

use crate::error::ApiError;
use crate::payload::{AttendanceUpdate, MedicalRecordUpdate, NewAttendance};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The clinic REST backend, as seen by the workflows.
///
/// One method per endpoint. Implementations do not retry; every failure is
/// returned to the caller as-is.
pub trait ClinicApi: Send + Sync {
    /// `GET /attendances`
    fn list_attendances(&self) -> BoxFuture<'_, Result<Vec<Attendance>, ApiError>>;

    /// `GET /attendances/:id`, including the nested medical record.
    fn get_attendance(&self, id: u64) -> BoxFuture<'_, Result<Attendance, ApiError>>;

    /// `POST /attendances`
    fn create_attendance(&self, attendance: NewAttendance) -> BoxFuture<'_, Result<(), ApiError>>;

    /// `PUT /attendances/:id`
    fn update_attendance(&self, update: AttendanceUpdate) -> BoxFuture<'_, Result<(), ApiError>>;

    /// `PUT /records/:id`
    fn update_medical_record(
        &self,
        update: MedicalRecordUpdate,
    ) -> BoxFuture<'_, Result<(), ApiError>>;

    /// `GET /patients`
    fn list_patients(&self) -> BoxFuture<'_, Result<Vec<Patient>, ApiError>>;

    /// `GET /professionals`
    fn list_professionals(&self) -> BoxFuture<'_, Result<Vec<Professional>, ApiError>>;
}
