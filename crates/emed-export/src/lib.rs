//! emed-export
//!
//! Client-side artifacts built from already-loaded data: the attendance
//! spreadsheet and single-item prescription documents (template → DOCX).

pub mod docx;
pub mod error;
pub mod file;
pub mod prescription;
pub mod spreadsheet;
pub mod styles;

pub use error::ExportError;
pub use file::ExportedFile;
