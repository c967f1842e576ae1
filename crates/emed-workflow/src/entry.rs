//! Page entry points. Nothing is loaded or rendered without a session
//! token; a missing or rejected token sends the user to the login route.

use tracing::{debug, warn};

use emed_client::{ApiError, ClinicApi};
use emed_core::models::attendance::Attendance;
use emed_core::routes::Route;
use emed_core::session::AuthToken;

#[derive(Debug, Clone, PartialEq)]
pub enum PageLoad<T> {
    Render(T),
    Redirect(Route),
}

impl<T> PageLoad<T> {
    pub fn into_render(self) -> Option<T> {
        match self {
            PageLoad::Render(value) => Some(value),
            PageLoad::Redirect(_) => None,
        }
    }
}

fn guard<T>(result: Result<T, ApiError>) -> Result<PageLoad<T>, ApiError> {
    match result {
        Ok(value) => Ok(PageLoad::Render(value)),
        Err(ApiError::Unauthenticated) => {
            warn!("session rejected, redirecting to login");
            Ok(PageLoad::Redirect(Route::Login))
        }
        Err(e) => Err(e),
    }
}

pub async fn load_dashboard(
    api: &dyn ClinicApi,
    token: Option<&AuthToken>,
) -> Result<PageLoad<Vec<Attendance>>, ApiError> {
    if token.is_none() {
        debug!("no session token");
        return Ok(PageLoad::Redirect(Route::Login));
    }
    guard(api.list_attendances().await)
}

pub async fn load_attendance(
    api: &dyn ClinicApi,
    token: Option<&AuthToken>,
    attendance_id: u64,
) -> Result<PageLoad<Attendance>, ApiError> {
    if token.is_none() {
        debug!("no session token");
        return Ok(PageLoad::Redirect(Route::Login));
    }
    guard(api.get_attendance(attendance_id).await)
}
