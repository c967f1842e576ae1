//! emed-client
//!
//! REST access to the clinic backend: the `ClinicApi` seam the workflows
//! depend on, and its reqwest implementation.

pub mod api;
pub mod error;
pub mod http;
pub mod payload;

pub use api::{BoxFuture, ClinicApi};
pub use error::ApiError;
pub use http::HttpClinicApi;
