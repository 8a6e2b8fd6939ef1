//! Client wrappers for the auth service endpoints. One request per call and
//! no retries; callers branch on the decoded [`AuthOutcome`].

use super::{
    api::ApiClient,
    outcome::{AuthEnvelope, AuthOutcome},
    types::{
        ForgotPasswordRequest, LoginRequest, LogoutRequest, ResendOtpRequest,
        ResetPasswordRequest, SignupRequest, VerifyOtpRequest,
    },
};
use crate::{
    device::{locate, GeoInfo},
    error::AppError,
};
use secrecy::SecretString;
use serde::Serialize;
use tracing::{debug, instrument};

#[derive(Clone, Debug)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Credentials must never be logged.
    ///
    /// # Errors
    /// Transport failures and undecodable bodies.
    #[instrument(skip_all)]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthOutcome, AppError> {
        let (status, envelope) = self.exchange("/login", request).await?;
        Ok(AuthOutcome::decode_login(status, envelope))
    }

    /// # Errors
    /// Transport failures and undecodable bodies.
    #[instrument(skip_all)]
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthOutcome, AppError> {
        self.submit("/signup", request).await
    }

    /// # Errors
    /// Transport failures and undecodable bodies.
    #[instrument(skip_all)]
    pub async fn verify_otp(&self, request: &VerifyOtpRequest) -> Result<AuthOutcome, AppError> {
        self.submit("/verify-otp", request).await
    }

    /// # Errors
    /// Transport failures and undecodable bodies.
    #[instrument(skip_all)]
    pub async fn resend_otp(&self, request: &ResendOtpRequest) -> Result<AuthOutcome, AppError> {
        self.submit("/resend-otp", request).await
    }

    /// # Errors
    /// Transport failures and undecodable bodies.
    #[instrument(skip_all)]
    pub async fn forgot_password(
        &self,
        request: &ForgotPasswordRequest,
    ) -> Result<AuthOutcome, AppError> {
        self.submit("/forgot-password", request).await
    }

    /// The reset token is a credential and is never logged.
    ///
    /// # Errors
    /// Transport failures and undecodable bodies.
    #[instrument(skip_all)]
    pub async fn reset_password(
        &self,
        request: &ResetPasswordRequest,
    ) -> Result<AuthOutcome, AppError> {
        self.submit("/reset-password", request).await
    }

    /// Tells the backend a session ended. Callers treat failures as
    /// informational; the local session is cleared regardless.
    ///
    /// # Errors
    /// Transport failures and non-2xx responses.
    #[instrument(skip_all)]
    pub async fn logout(
        &self,
        bearer: Option<&SecretString>,
        request: &LogoutRequest,
    ) -> Result<(), AppError> {
        self.api.post_json_empty("/logout", request, bearer).await
    }

    /// Location as seen by the auth service; placeholders on any failure.
    pub async fn geo(&self) -> GeoInfo {
        match self.api.url("/geo") {
            Ok(url) => locate(self.api.http(), &url).await,
            Err(err) => {
                debug!("Skipping geolocation: {err}");
                GeoInfo::default()
            }
        }
    }

    async fn submit<B: Serialize>(&self, path: &str, body: &B) -> Result<AuthOutcome, AppError> {
        let (status, envelope) = self.exchange(path, body).await?;
        Ok(AuthOutcome::decode(status, envelope))
    }

    async fn exchange<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(reqwest::StatusCode, AuthEnvelope), AppError> {
        let (status, envelope) = self.api.post_json_any_status(path, body, None).await?;
        debug!(path, status = status.as_u16(), "Auth service responded");
        Ok((status, envelope))
    }
}
