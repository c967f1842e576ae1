pub mod attendance;
pub mod medical_record;
pub mod patient;
