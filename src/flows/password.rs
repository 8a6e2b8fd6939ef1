//! Password recovery: request a reset link, then set a new password from it.

use super::{backend_message, Backends, Notice, Submission};
use crate::{
    device::RequestSource,
    error::ValidationError,
    gateway::{AuthOutcome, ForgotPasswordRequest, ResetPasswordRequest},
    session::transitions::{self, FORGOT_PASSWORD_REDIRECT_SECS},
    store::CredentialStore,
    validate,
};
use std::sync::Arc;
use tracing::warn;

const LINK_SENT_MESSAGE: &str = "A password reset link has been sent to your email.";
const LINK_FALLBACK: &str = "Failed to send reset link. Try again.";
const INVALID_LINK: &str = "Invalid or expired reset link.";
const UPDATED_MESSAGE: &str = "Password updated successfully. Redirecting...";
const RESET_FALLBACK: &str = "Reset failed.";

#[derive(Debug)]
pub struct ForgotPasswordPage {
    backends: Backends,
}

impl ForgotPasswordPage {
    #[must_use]
    pub fn new(backends: Backends) -> Self {
        Self { backends }
    }

    /// On success the page counts down [`FORGOT_PASSWORD_REDIRECT_SECS`]
    /// before returning to login.
    pub async fn submit(&self, email: &str) -> Submission {
        let email = email.trim();
        if let Err(err) = validate::email(email) {
            return Submission::error(err.to_string());
        }

        let device = self.backends.device.collect().await;
        let request = ForgotPasswordRequest {
            email: email.to_string(),
            device: device.metadata(RequestSource::ForgotPassword),
        };

        match self.backends.auth.forgot_password(&request).await {
            Ok(AuthOutcome::Success { .. }) => Submission::notice(Notice::Success(format!(
                "{LINK_SENT_MESSAGE} Redirecting in {FORGOT_PASSWORD_REDIRECT_SECS} seconds..."
            )))
            .then(transitions::reset_link_sent()),
            Ok(outcome) => Submission::error(backend_message(outcome.message(), LINK_FALLBACK)),
            Err(err) => {
                warn!("Reset link request failed: {err}");
                Submission::error(err.user_message())
            }
        }
    }
}

/// New-password form reached from an emailed link. Submission needs the
/// stored reset marker even when the page was opened with a URL token.
#[derive(Debug)]
pub struct ResetPasswordPage {
    store: Arc<CredentialStore>,
    backends: Backends,
}

impl ResetPasswordPage {
    #[must_use]
    pub fn new(store: Arc<CredentialStore>, backends: Backends) -> Self {
        Self { store, backends }
    }

    pub async fn submit(&self, password: &str, confirmation: &str) -> Submission {
        let Some(marker) = self.store.reset_marker() else {
            return Submission::error(INVALID_LINK);
        };
        if password != confirmation {
            return Submission::error(ValidationError::PasswordMismatch.to_string());
        }
        if !validate::valid_password(password) {
            return Submission::error(ValidationError::Password.to_string());
        }

        let device = self.backends.device.collect().await;
        let request = ResetPasswordRequest {
            token: marker.reset_token,
            new_password: password.to_string(),
            device: device.metadata(RequestSource::ResetPassword),
        };

        match self.backends.auth.reset_password(&request).await {
            Ok(AuthOutcome::Success { .. }) => {
                Submission::notice(Notice::Success(UPDATED_MESSAGE.to_string()))
                    .then(transitions::reset_succeeded(&self.store))
            }
            Ok(outcome) => Submission::error(backend_message(outcome.message(), RESET_FALLBACK)),
            Err(err) => {
                warn!("Password reset failed: {err}");
                Submission::error(err.user_message())
            }
        }
    }
}
