//! emed-desk library root.
//!
//! Re-exports the config and console modules so integration tests can
//! exercise them without going through the command line.

pub mod commands;
pub mod config;
pub mod console;
