//! emed-workflow
//!
//! Client-side orchestration of the clinic screens: the attendance detail
//! workflow (vitals, finalize, prescriptions) and the dashboard workflow
//! (create, reschedule, cancel, attend, no-show, export).
//!
//! Workflows own their local state and talk to the outside world only
//! through [`emed_client::ClinicApi`] and the collaborator traits in
//! [`services`]. Every mutation is a single awaited request; dependent
//! requests are chained and short-circuit on the first failure.

pub mod attendance;
pub mod dashboard;
pub mod entry;
pub mod error;
pub mod form;
pub mod modal;
pub mod services;

pub use error::{FieldError, ValidationErrors, WorkflowError};
