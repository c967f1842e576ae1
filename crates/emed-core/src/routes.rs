//! Front-end route conventions.
//!
//! Pure string functions. These define the navigation targets the
//! workflows hand to the navigator.

use std::fmt;

pub const LOGIN: &str = "/";

pub const DASHBOARD: &str = "/dashboard";

pub fn attendance(id: u64) -> String {
    format!("/dashboard/attendance/{id}")
}

pub fn prescriptions(attendance_id: u64) -> String {
    format!("/dashboard/attendance/{attendance_id}/prescriptions")
}

pub fn patient_records(patient_id: u64) -> String {
    format!("/dashboard/patients/view/{patient_id}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Attendance(u64),
    Prescriptions(u64),
    PatientRecords(u64),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => LOGIN.to_string(),
            Route::Dashboard => DASHBOARD.to_string(),
            Route::Attendance(id) => attendance(*id),
            Route::Prescriptions(id) => prescriptions(*id),
            Route::PatientRecords(id) => patient_records(*id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
