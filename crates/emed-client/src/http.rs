use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use emed_core::models::attendance::Attendance;
use emed_core::models::patient::{Patient, Professional};
use emed_core::session::AuthToken;

use crate::api::{BoxFuture, ClinicApi};
use crate::error::ApiError;
use crate::payload::{AttendanceUpdate, MedicalRecordUpdate, NewAttendance};

/// Error body shape returned by the backend.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// `ClinicApi` over HTTP with a bearer token.
#[derive(Debug, Clone)]
pub struct HttpClinicApi {
    http: reqwest::Client,
    base_url: String,
    token: AuthToken,
}

impl HttpClinicApi {
    pub fn new(base_url: &str, token: AuthToken) -> Result<Self, ApiError> {
        let base_url = base_url.trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::BaseUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("emed-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        debug!(%method, %url, "api request");
        self.http
            .request(method, url)
            .bearer_auth(self.token.expose())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.request(Method::GET, path).send().await?;
        let resp = check(resp).await?;
        resp.json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_json<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let resp = self.request(method, path).json(body).send().await?;
        check(resp).await?;
        Ok(())
    }
}

/// Map non-success statuses to `ApiError`, keeping the server's message.
async fn check(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == StatusCode::UNAUTHORIZED {
        warn!("api rejected credentials");
        return Err(ApiError::Unauthenticated);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .filter(|m| !m.trim().is_empty());

    warn!(status = status.as_u16(), message = ?message, "api request rejected");
    Err(ApiError::Rejected {
        status: status.as_u16(),
        message,
    })
}

impl ClinicApi for HttpClinicApi {
    fn list_attendances(&self) -> BoxFuture<'_, Result<Vec<Attendance>, ApiError>> {
        Box::pin(self.get_json("/attendances"))
    }

    fn get_attendance(&self, id: u64) -> BoxFuture<'_, Result<Attendance, ApiError>> {
        Box::pin(async move {
            let path = format!("/attendances/{id}");
            self.get_json(&path).await
        })
    }

    fn create_attendance(&self, attendance: NewAttendance) -> BoxFuture<'_, Result<(), ApiError>> {
        Box::pin(async move {
            self.send_json(Method::POST, "/attendances", &attendance)
                .await
        })
    }

    fn update_attendance(&self, update: AttendanceUpdate) -> BoxFuture<'_, Result<(), ApiError>> {
        Box::pin(async move {
            let path = format!("/attendances/{}", update.id);
            self.send_json(Method::PUT, &path, &update).await
        })
    }

    fn update_medical_record(
        &self,
        update: MedicalRecordUpdate,
    ) -> BoxFuture<'_, Result<(), ApiError>> {
        Box::pin(async move {
            let path = format!("/records/{}", update.id);
            self.send_json(Method::PUT, &path, &update).await
        })
    }

    fn list_patients(&self) -> BoxFuture<'_, Result<Vec<Patient>, ApiError>> {
        Box::pin(self.get_json("/patients"))
    }

    fn list_professionals(&self) -> BoxFuture<'_, Result<Vec<Professional>, ApiError>> {
        Box::pin(self.get_json("/professionals"))
    }
}
