//! OTP verification and the "verify your email first" page.

use super::{backend_message, Backends, Notice, Submission};
use crate::{
    device::RequestSource,
    error::ValidationError,
    gateway::{AuthOutcome, ResendOtpRequest, VerifyOtpRequest, RESEND_OTP_ACTION},
    session::{resend_cooldown, transitions, Countdown, Route, Transition, RESEND_COOLDOWN_SECS},
    store::CredentialStore,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

const OTP_SENT_MESSAGE: &str = "OTP sent successfully! Please verify to continue.";
const VERIFIED_MESSAGE: &str = "OTP verified! Redirecting...";
const INVALID_OTP_FALLBACK: &str = "Invalid OTP";
const RESENT_MESSAGE: &str = "OTP resent successfully!";
const RESEND_FALLBACK: &str = "Failed to resend OTP";
const PENDING_RESENT_MESSAGE: &str = "OTP resent successfully. Please check your inbox.";
const PENDING_RESEND_FALLBACK: &str = "Could not resend OTP. Try again later.";
const EMAIL_MISSING: &str = "Email not found. Please sign up again.";

fn cooldown_message(seconds: u32) -> String {
    format!("Please wait {seconds}s before requesting another OTP.")
}

/// Shows enough of an address to recognise it: `abcdefyz@x.io` becomes
/// `abc***yz@x.io`.
#[must_use]
pub fn mask_email(email: &str) -> String {
    let email = email.trim();
    if email.is_empty() {
        return "your email".to_string();
    }

    let Some((local, domain)) = email.split_once('@') else {
        let head: String = email.chars().take(3).collect();
        return format!("{head}***");
    };

    let chars: Vec<char> = local.chars().collect();
    if chars.len() <= 5 {
        let head: String = chars.iter().take(1).collect();
        return format!("{head}***@{domain}");
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{head}***{tail}@{domain}")
}

#[derive(Debug)]
pub struct VerifyOtpPage {
    store: Arc<CredentialStore>,
    backends: Backends,
    email: String,
    cooldown: Countdown,
}

impl VerifyOtpPage {
    /// Opens the page for the pending signup in this tab. Without one the
    /// visitor is sent back to signup.
    ///
    /// # Errors
    /// Returns the redirect when no OTP is pending or the address is missing.
    pub fn open(store: Arc<CredentialStore>, backends: Backends) -> Result<Self, Transition> {
        let marker = store
            .signup_marker()
            .filter(|marker| marker.otp_pending && !marker.email.trim().is_empty())
            .ok_or(Transition::now(Route::Signup))?;

        let now = Utc::now();
        let cooldown = if let Some(last_sent) = marker.otp_last_sent_at {
            resend_cooldown(Some(last_sent), now)
        } else {
            store.stamp_otp_sent(now);
            Countdown::new(RESEND_COOLDOWN_SECS)
        };

        Ok(Self {
            store,
            backends,
            email: marker.email,
            cooldown,
        })
    }

    #[must_use]
    pub fn greeting(&self) -> Notice {
        Notice::Info(OTP_SENT_MESSAGE.to_string())
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn cooldown(&self) -> Countdown {
        self.cooldown
    }

    pub fn tick_cooldown(&mut self) -> u32 {
        self.cooldown.tick()
    }

    pub async fn verify(&self, otp: &str) -> Submission {
        let otp = otp.trim();
        if otp.is_empty() {
            return Submission::error(ValidationError::EmptyOtp.to_string());
        }

        let device = self.backends.device.collect().await;
        let request = VerifyOtpRequest {
            email: self.email.clone(),
            otp: otp.to_string(),
            device: device.metadata(RequestSource::Unlabeled),
        };

        match self.backends.auth.verify_otp(&request).await {
            Ok(AuthOutcome::Success { .. }) => {
                Submission::notice(Notice::Success(VERIFIED_MESSAGE.to_string()))
                    .then(transitions::otp_verified(&self.store))
            }
            Ok(outcome) => {
                Submission::error(backend_message(outcome.message(), INVALID_OTP_FALLBACK))
            }
            Err(err) => {
                warn!("OTP verification failed: {err}");
                Submission::error(err.user_message())
            }
        }
    }

    /// Requests a fresh OTP once the cooldown is over.
    pub async fn resend(&mut self) -> Submission {
        if self.cooldown.is_running() {
            return Submission::error(cooldown_message(self.cooldown.remaining()));
        }

        let request = ResendOtpRequest {
            email: self.email.clone(),
            action: None,
            device: None,
        };
        match self.backends.auth.resend_otp(&request).await {
            Ok(AuthOutcome::Success { .. }) => {
                self.restart_cooldown();
                Submission::notice(Notice::Success(RESENT_MESSAGE.to_string()))
            }
            Ok(outcome) => Submission::error(backend_message(outcome.message(), RESEND_FALLBACK)),
            Err(err) => {
                warn!("OTP resend failed: {err}");
                Submission::error(err.user_message())
            }
        }
    }

    fn restart_cooldown(&mut self) {
        self.store.stamp_otp_sent(Utc::now());
        self.cooldown = Countdown::new(RESEND_COOLDOWN_SECS);
        info!("OTP resent");
    }
}

/// Shown after a login for an unverified account.
#[derive(Debug)]
pub struct VerifyPendingPage {
    store: Arc<CredentialStore>,
    backends: Backends,
    email: String,
    cooldown: Countdown,
}

impl VerifyPendingPage {
    #[must_use]
    pub fn open(store: Arc<CredentialStore>, backends: Backends) -> Self {
        let marker = store.signup_marker();
        let email = marker
            .as_ref()
            .map(|marker| marker.email.trim().to_string())
            .unwrap_or_default();
        let last_sent = marker.and_then(|marker| marker.otp_last_sent_at);

        Self {
            store,
            backends,
            email,
            cooldown: resend_cooldown(last_sent, Utc::now()),
        }
    }

    #[must_use]
    pub fn masked_email(&self) -> String {
        mask_email(&self.email)
    }

    #[must_use]
    pub fn cooldown(&self) -> Countdown {
        self.cooldown
    }

    pub fn tick_cooldown(&mut self) -> u32 {
        self.cooldown.tick()
    }

    #[must_use]
    pub fn verify_now(&self) -> Transition {
        Transition::now(Route::VerifyOtp)
    }

    pub async fn resend(&mut self) -> Submission {
        if self.cooldown.is_running() {
            return Submission::error(cooldown_message(self.cooldown.remaining()));
        }
        if self.email.is_empty() {
            return Submission::error(EMAIL_MISSING);
        }

        let device = self.backends.device.collect().await;
        let request = ResendOtpRequest {
            email: self.email.clone(),
            action: Some(RESEND_OTP_ACTION),
            device: Some(device.metadata(RequestSource::Unlabeled)),
        };
        match self.backends.auth.resend_otp(&request).await {
            Ok(AuthOutcome::Success { .. }) => {
                self.store.stamp_otp_sent(Utc::now());
                self.cooldown = Countdown::new(RESEND_COOLDOWN_SECS);
                Submission::notice(Notice::Success(PENDING_RESENT_MESSAGE.to_string()))
            }
            Ok(outcome) => {
                Submission::error(backend_message(outcome.message(), PENDING_RESEND_FALLBACK))
            }
            Err(err) => {
                warn!("OTP resend failed: {err}");
                Submission::error(err.user_message())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::testing;
    use chrono::Duration as ChronoDuration;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn masks_addresses() {
        assert_eq!(mask_email("abcdefyz@domain.com"), "abc***yz@domain.com");
        assert_eq!(mask_email("ada@x.io"), "a***@x.io");
        assert_eq!(mask_email("noatsign"), "noa***");
        assert_eq!(mask_email(" "), "your email");
    }

    #[tokio::test]
    async fn otp_page_requires_pending_marker() {
        let server = MockServer::start().await;
        let err = VerifyOtpPage::open(testing::store(), testing::backends(&server)).unwrap_err();
        assert_eq!(err, Transition::now(Route::Signup));
    }

    #[tokio::test]
    async fn open_stamps_missing_last_sent() {
        let server = MockServer::start().await;
        let store = testing::store();
        store.mark_otp_pending("ada@example.com");
        assert!(store.signup_marker().unwrap().otp_last_sent_at.is_none());

        let page = VerifyOtpPage::open(store.clone(), testing::backends(&server)).unwrap();
        assert_eq!(page.cooldown().remaining(), RESEND_COOLDOWN_SECS);
        assert!(store.signup_marker().unwrap().otp_last_sent_at.is_some());
        assert_eq!(page.email(), "ada@example.com");
    }

    #[tokio::test]
    async fn empty_otp_is_rejected_locally() {
        let server = MockServer::start().await;
        let store = testing::store();
        store.begin_signup("ada@example.com", Utc::now());
        let page = VerifyOtpPage::open(store, testing::backends(&server)).unwrap();

        let submission = page.verify("   ").await;
        assert_eq!(
            submission.notice,
            Some(Notice::Error("Please enter OTP".to_string()))
        );
        assert_eq!(server.received_requests().await.map(|r| r.len()), Some(0));
    }

    #[tokio::test]
    async fn verify_success_clears_markers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/verify-otp"))
            .and(body_partial_json(json!({"email": "ada@example.com", "otp": "123456"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let store = testing::store();
        store.begin_signup("ada@example.com", Utc::now());
        let page = VerifyOtpPage::open(store.clone(), testing::backends(&server)).unwrap();

        let submission = page.verify("123456").await;
        assert_eq!(submission.transition.map(|t| t.to), Some(Route::Login));
        assert!(store.signup_marker().is_none());
    }

    #[tokio::test]
    async fn resend_waits_for_cooldown_then_restarts_it() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/resend-otp"))
            .and(body_json(json!({"email": "ada@example.com"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let store = testing::store();
        store.begin_signup("ada@example.com", Utc::now() - ChronoDuration::seconds(10));
        let mut page = VerifyOtpPage::open(store, testing::backends(&server)).unwrap();

        let early = page.resend().await;
        assert!(early.is_error());

        while page.cooldown().is_running() {
            page.tick_cooldown();
        }
        let submission = page.resend().await;
        assert_eq!(
            submission.notice,
            Some(Notice::Success(RESENT_MESSAGE.to_string()))
        );
        assert_eq!(page.cooldown().remaining(), RESEND_COOLDOWN_SECS);
    }

    #[tokio::test]
    async fn pending_resend_without_email() {
        let server = MockServer::start().await;
        let mut page = VerifyPendingPage::open(testing::store(), testing::backends(&server));
        assert_eq!(page.masked_email(), "your email");

        let submission = page.resend().await;
        assert_eq!(submission.notice, Some(Notice::Error(EMAIL_MISSING.to_string())));
    }

    #[tokio::test]
    async fn pending_resend_labels_action() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/resend-otp"))
            .and(body_partial_json(json!({
                "email": "abcdefyz@example.com",
                "action": "RESEND_OTP"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let store = testing::store();
        store.mark_otp_pending("abcdefyz@example.com");
        let mut page = VerifyPendingPage::open(store.clone(), testing::backends(&server));
        assert_eq!(page.masked_email(), "abc***yz@example.com");
        assert!(!page.cooldown().is_running());

        let submission = page.resend().await;
        assert!(!submission.is_error());
        assert!(page.cooldown().is_running());
        assert!(store.signup_marker().unwrap().otp_last_sent_at.is_some());
        assert_eq!(page.verify_now(), Transition::now(Route::VerifyOtp));
    }
}
