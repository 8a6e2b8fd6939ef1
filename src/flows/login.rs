use super::{backend_message, Backends, Notice, Submission};
use crate::{
    device::RequestSource,
    error::SERVER_UNREACHABLE,
    gateway::{AuthOutcome, LoginRequest},
    session::{transitions, Countdown},
    store::CredentialStore,
};
use std::sync::Arc;
use tracing::{info, warn};

const UNVERIFIED_MESSAGE: &str = "Please verify your email before logging in.";
const REJECTED_FALLBACK: &str = "Invalid email or password";

fn locked_message(seconds: u32) -> String {
    format!("Account locked. Try again in {seconds} seconds.")
}

/// Login form. While a lockout countdown runs the submit control is disabled
/// and no request is sent.
#[derive(Debug)]
pub struct LoginPage {
    store: Arc<CredentialStore>,
    backends: Backends,
    lockout: Countdown,
    notice: Option<Notice>,
}

impl LoginPage {
    #[must_use]
    pub fn new(store: Arc<CredentialStore>, backends: Backends) -> Self {
        Self {
            store,
            backends,
            lockout: Countdown::default(),
            notice: None,
        }
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.lockout.is_running()
    }

    #[must_use]
    pub fn lockout_remaining(&self) -> u32 {
        self.lockout.remaining()
    }

    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub async fn submit(&mut self, email: &str, password: &str) -> Submission {
        if !self.can_submit() {
            return Submission::error(locked_message(self.lockout.remaining()));
        }
        self.notice = None;

        // Login reports the location the auth service sees, not the third-party one.
        let geo = self.backends.auth.geo().await;
        let device = self.backends.device.with_geo(geo);
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
            device: device.metadata(RequestSource::Web),
        };

        let submission = match self.backends.auth.login(&request).await {
            Ok(AuthOutcome::Locked {
                remaining_seconds, ..
            }) => {
                info!(remaining_seconds, "Account locked");
                self.lockout = Countdown::new(remaining_seconds);
                Submission::error(locked_message(remaining_seconds))
            }
            Ok(AuthOutcome::Unverified { .. }) => Submission::error(UNVERIFIED_MESSAGE)
                .then(transitions::login_unverified(&self.store, &request.email)),
            Ok(AuthOutcome::Success {
                token: Some(token),
                user,
                ..
            }) => Submission::default().then(transitions::login_succeeded(
                &self.store,
                &token,
                user.as_ref(),
            )),
            Ok(outcome) => {
                Submission::error(backend_message(outcome.message(), REJECTED_FALLBACK))
            }
            Err(err) => {
                warn!("Login request failed: {err}");
                Submission::error(SERVER_UNREACHABLE)
            }
        };

        self.notice.clone_from(&submission.notice);
        submission
    }

    /// Advances the lockout one second. Reaching zero re-enables submit and
    /// clears the lockout message.
    pub fn tick(&mut self) -> u32 {
        if !self.lockout.is_running() {
            return 0;
        }
        let left = self.lockout.tick();
        if left == 0 {
            self.notice = None;
        }
        left
    }

    /// Runs the lockout countdown to zero, then unlocks as [`Self::tick`] would.
    pub async fn wait_for_unlock(&mut self, on_tick: impl FnMut(u32)) {
        if !self.lockout.is_running() {
            return;
        }
        self.lockout.run(on_tick).await;
        self.lockout = Countdown::default();
        self.notice = None;
    }
}
