//! Error types shared by the gateways, the page controllers and the CLI.
//!
//! Page controllers never let an `AppError` escape to the user as-is: they turn
//! it into a notice with [`AppError::user_message`], matching the taxonomy of
//! network-unreachable, validation, backend-rejected and timeout failures.

use thiserror::Error;

/// Message shown when the backend cannot be reached at all.
pub const SERVER_UNREACHABLE: &str = "Server not reachable. Try again later.";

#[derive(Clone, Debug, Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl AppError {
    /// Text a page shows for this failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) | Self::Timeout(_) => SERVER_UNREACHABLE.to_string(),
            Self::Http { message, .. } => message.clone(),
            Self::Validation(err) => err.to_string(),
            Self::Config(_) | Self::Parse(_) | Self::Serialization(_) => self.to_string(),
        }
    }
}

/// Client-side form checks, surfaced inline before any request is sent.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid email format")]
    Email,
    #[error("Mobile number must be 10 digits")]
    Mobile,
    #[error("Password must be 8-12 chars, include uppercase, lowercase, number & special char")]
    Password,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Please enter OTP")]
    EmptyOtp,
}
