use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with an error status. `message` is the `error`
    /// field of the response body, when there was one.
    #[error("request rejected ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected { status: u16, message: Option<String> },

    #[error("not authenticated")]
    Unauthenticated,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("invalid base url: {0}")]
    BaseUrl(String),
}

impl ApiError {
    /// Server-provided error text, suitable for showing verbatim.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}
