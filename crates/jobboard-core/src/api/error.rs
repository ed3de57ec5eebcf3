use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {}", .msg.as_deref().unwrap_or("no message"))]
    BadRequest { msg: Option<String> },

    #[error("Unauthorized - credentials or token rejected")]
    Unauthorized,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Gateway error (status {0})")]
    Gateway(u16),

    #[error("Unexpected status {status}: {}", .msg.as_deref().unwrap_or("no message"))]
    Unexpected { status: u16, msg: Option<String> },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Error body shape used by the backend: `{"msg": "..."}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
}

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    /// Extract the backend's `msg` field, if the body is JSON and carries one
    fn backend_msg(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.msg)
            .map(|m| Self::truncate_body(&m))
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        match status.as_u16() {
            400 => ApiError::BadRequest {
                msg: Self::backend_msg(body),
            },
            401 => ApiError::Unauthorized,
            500 => ApiError::ServerError(Self::truncate_body(body)),
            code @ 502..=504 => ApiError::Gateway(code),
            code => ApiError::Unexpected {
                status: code,
                msg: Self::backend_msg(body),
            },
        }
    }

    /// The backend's own message for client-side (4xx) rejections.
    /// Server faults never expose their body here.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::BadRequest { msg } => msg.as_deref(),
            ApiError::Unexpected { status, msg } if (400..500).contains(status) => msg.as_deref(),
            _ => None,
        }
    }
}
