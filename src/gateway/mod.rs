//! HTTP clients for the auth and chat services.

mod api;
mod auth;
mod chat;
mod outcome;
mod types;

pub use api::{http_client, ApiClient};
pub use auth::AuthClient;
pub use chat::ChatClient;
pub use outcome::{AuthEnvelope, AuthOutcome};
pub use types::{
    ChatMessage, ForgotPasswordRequest, LoginRequest, LogoutRequest, ResendOtpRequest,
    ResetPasswordRequest, Role, SignupRequest, VerifyOtpRequest, RESEND_OTP_ACTION,
};
