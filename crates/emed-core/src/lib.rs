//! emed-core
//!
//! Pure domain types for the eMed clinic front-end: attendances, medical
//! records, the attendance status lifecycle, BMI derivation, scheduling
//! rules, and the session/capability context the workflows run under.
//! No network or filesystem dependency.

pub mod bmi;
pub mod error;
pub mod models;
pub mod routes;
pub mod schedule;
pub mod session;
pub mod status;

pub use error::CoreError;
