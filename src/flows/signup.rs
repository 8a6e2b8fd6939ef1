use super::{backend_message, Backends, Notice, Submission};
use crate::{
    device::RequestSource,
    gateway::{AuthOutcome, SignupRequest},
    session::transitions,
    store::CredentialStore,
    validate,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::warn;

const SUCCESS_MESSAGE: &str = "OTP sent! Redirecting to verification page...";
const REJECTED_FALLBACK: &str = "Signup failed. Try again.";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug)]
pub struct SignupPage {
    store: Arc<CredentialStore>,
    backends: Backends,
}

impl SignupPage {
    #[must_use]
    pub fn new(store: Arc<CredentialStore>, backends: Backends) -> Self {
        Self { store, backends }
    }

    /// Validates, registers, and on success opens the OTP flow for this tab.
    pub async fn submit(&self, form: &SignupForm) -> Submission {
        let email = form.email.trim();
        let mobile = form.mobile.trim();
        if let Err(err) = validate::signup(mobile, email, &form.password, &form.confirm_password) {
            return Submission::error(err.to_string());
        }

        let device = self.backends.device.collect().await;
        let request = SignupRequest {
            name: form.name.trim().to_string(),
            email: email.to_string(),
            mobile: mobile.to_string(),
            password: form.password.clone(),
            device: device.metadata(RequestSource::Web),
        };

        match self.backends.auth.signup(&request).await {
            Ok(AuthOutcome::Success { .. }) => {
                Submission::notice(Notice::Success(SUCCESS_MESSAGE.to_string())).then(
                    transitions::signup_succeeded(&self.store, email, Utc::now()),
                )
            }
            Ok(outcome) => Submission::error(backend_message(outcome.message(), REJECTED_FALLBACK)),
            Err(err) => {
                warn!("Signup request failed: {err}");
                Submission::error(err.user_message())
            }
        }
    }
}
