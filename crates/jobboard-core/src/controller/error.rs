use thiserror::Error;

use super::forms::FieldErrors;
use crate::api::ApiError;

/// Backend message that marks a duplicate email on registration
const DUPLICATE_EMAIL_MSG: &str = "Validation error";

pub const INVALID_USER_MESSAGE: &str = "!Invalid user";
pub const EMAIL_TAKEN_MESSAGE: &str = "Email taken";
pub const SERVER_ERROR_MESSAGE: &str = "Server-side error occurred. Please try again later.";
pub const NETWORK_ERROR_MESSAGE: &str = "Network response was not ok.";
pub const INVALID_TOKEN_MESSAGE: &str = "Received an unreadable session token.";

/// User-facing outcome of a failed authentication operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Please fix the highlighted fields: {0}")]
    Validation(FieldErrors),

    /// Bad credentials. Deliberately silent on which field was wrong.
    #[error("{}", INVALID_USER_MESSAGE)]
    InvalidCredentials,

    #[error("{}", EMAIL_TAKEN_MESSAGE)]
    EmailTaken,

    /// Backend rejection passed through verbatim
    #[error("{0}")]
    Rejected(String),

    #[error("{}", SERVER_ERROR_MESSAGE)]
    Server,

    #[error("{}", NETWORK_ERROR_MESSAGE)]
    Gateway,

    #[error("Unexpected response from server (status {0})")]
    Unexpected(u16),

    #[error("{}", INVALID_TOKEN_MESSAGE)]
    InvalidToken,
}

impl AuthError {
    /// Message shown next to the form
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Classification shared by every operation
    pub(crate) fn from_api(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => AuthError::InvalidCredentials,
            ApiError::Gateway(_) | ApiError::Network(_) => AuthError::Gateway,
            ApiError::Unexpected { status, .. } => AuthError::Unexpected(status),
            ApiError::BadRequest { .. }
            | ApiError::ServerError(_)
            | ApiError::InvalidResponse(_)
            | ApiError::InvalidUrl(_) => AuthError::Server,
        }
    }

    /// Seeker registration: any 400 is the duplicate-email case.
    pub(crate) fn from_seeker_registration(err: ApiError) -> Self {
        match err {
            ApiError::BadRequest { .. } => AuthError::EmailTaken,
            other => Self::from_api(other),
        }
    }

    /// Company registration: client rejections carry a backend message that is
    /// shown as-is, except for the duplicate-email marker.
    pub(crate) fn from_company_registration(err: ApiError) -> Self {
        match err.backend_message() {
            Some(DUPLICATE_EMAIL_MSG) => AuthError::EmailTaken,
            Some(msg) => AuthError::Rejected(msg.to_string()),
            None => Self::from_api(err),
        }
    }
}
