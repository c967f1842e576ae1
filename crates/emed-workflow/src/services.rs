//! Collaborators the workflows hand their side effects to.

use std::sync::Arc;

use tracing::warn;

use emed_core::routes::Route;
use emed_core::schedule::Clock;
use emed_export::ExportedFile;

use crate::error::WorkflowError;

pub const GENERIC_ERROR_TITLE: &str = "Something went wrong";
pub const GENERIC_ERROR_MESSAGE: &str = "The request could not be completed. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

/// A toast shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub title: String,
    pub message: Option<String>,
}

impl Notification {
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            title: title.into(),
            message: None,
        }
    }

    /// The server's text when it sent one, else the generic notice.
    pub fn failure(server_message: Option<&str>) -> Self {
        Self {
            level: Level::Error,
            title: GENERIC_ERROR_TITLE.to_string(),
            message: Some(server_message.unwrap_or(GENERIC_ERROR_MESSAGE).to_string()),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Print/export service for generated documents.
pub trait Printer: Send + Sync {
    fn print(&self, document: ExportedFile) -> std::io::Result<()>;
}

/// Browser-style file download.
pub trait Downloads: Send + Sync {
    fn save(&self, file: ExportedFile) -> std::io::Result<()>;
}

/// Everything a workflow needs besides the API.
#[derive(Clone)]
pub struct Services {
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
    pub printer: Arc<dyn Printer>,
    pub downloads: Arc<dyn Downloads>,
    pub clock: Arc<dyn Clock>,
}

impl Services {
    pub(crate) fn notify_success(&self, title: &str) {
        self.notifier.notify(Notification::success(title));
    }

    /// Surfaces a failed action. Request, export and delivery failures get a
    /// notification; client-side guard errors are only returned.
    pub(crate) fn report(&self, action: &'static str, err: &WorkflowError) {
        let notification = match err {
            WorkflowError::Api(api) => Notification::failure(api.server_message()),
            WorkflowError::Export(_) | WorkflowError::Delivery(_) => Notification::failure(None),
            _ => return,
        };
        warn!(action, error = %err, "action failed");
        self.notifier.notify(notification);
    }
}
