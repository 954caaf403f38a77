use std::collections::BTreeMap;
use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors that can occur while relaying a request to the recipe API
#[derive(Error, Debug)]
pub enum RelayError {
    /// No API key was configured for the upstream service
    #[error("API key not configured")]
    MissingApiKey,

    /// Upstream rejected the API key
    #[error("Invalid API key")]
    InvalidApiKey,

    /// Upstream answered with a non-success status other than 401
    #[error("API Error: {0}")]
    UpstreamStatus(u16),

    /// Failed to reach upstream or decode its body
    #[error("{0}")]
    Fetch(#[from] reqwest::Error),

    /// The configured base URL cannot carry a request path
    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(String),

    /// The incoming request could not be read
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Upstream answered with a body of the wrong shape
    #[error("Unexpected response: {0}")]
    UnexpectedBody(&'static str),

    /// Failed to bind or serve the listening socket
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A relay failure paired with the route's user-facing message
#[derive(Debug)]
pub struct ApiError {
    pub source: RelayError,
    pub message: &'static str,
}

impl ApiError {
    /// Pair `source` with `message`, unless the failure is about the credential
    pub fn new(source: RelayError, message: &'static str) -> Self {
        let message = match source {
            RelayError::MissingApiKey => MISSING_KEY_HINT,
            RelayError::InvalidApiKey => "Please check your Spoonacular API key",
            _ => message,
        };
        Self { source, message }
    }

    /// No credential is configured, whichever route was asked for
    pub fn missing_api_key() -> Self {
        Self {
            source: RelayError::MissingApiKey,
            message: MISSING_KEY_HINT,
        }
    }
}

const MISSING_KEY_HINT: &str = "Please make sure you have set up your Spoonacular API key";

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.source.status();
        let body = json!({
            "error": self.source.to_string(),
            "message": self.message,
        });

        (status, Json(body)).into_response()
    }
}

/// Form field that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Email,
    Password,
    Name,
    ConfirmPassword,
}

/// Per-field validation messages, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<Field, &'static str>);

impl FormErrors {
    pub fn insert(&mut self, field: Field, message: &'static str) {
        self.0.insert(field, message);
    }

    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn into_result(self) -> Result<(), SessionError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(SessionError::Validation(self))
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().copied().collect();
        write!(f, "{}", messages.join("; "))
    }
}

/// Errors raised by the client-side session
#[derive(Error, Debug)]
pub enum SessionError {
    /// One or more form fields are invalid
    #[error("Invalid form: {0}")]
    Validation(FormErrors),

    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("No account found with this email. Please sign up.")]
    AccountNotFound,

    #[error("Incorrect password")]
    IncorrectPassword,

    /// Saving recipes requires a logged-in user
    #[error("Please log in first")]
    NotLoggedIn,

    /// Stored data could not be decoded
    #[error("Stored data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
