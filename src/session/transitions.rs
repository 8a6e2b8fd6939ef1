//! Store mutations triggered by backend responses, each paired with the
//! navigation that follows it.

use super::route::Route;
use crate::store::{CredentialStore, UserProfile};
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::info;

pub const SIGNUP_REDIRECT_DELAY: Duration = Duration::from_millis(1500);
pub const UNVERIFIED_REDIRECT_DELAY: Duration = Duration::from_millis(1200);
pub const OTP_VERIFIED_REDIRECT_DELAY: Duration = Duration::from_millis(1500);
pub const RESET_REDIRECT_DELAY: Duration = Duration::from_millis(2500);
/// Forgot-password success counts down this many seconds before leaving.
pub const FORGOT_PASSWORD_REDIRECT_SECS: u32 = 3;

/// Where to go next, and how long the current page stays up first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub to: Route,
    pub delay: Duration,
}

impl Transition {
    #[must_use]
    pub const fn now(to: Route) -> Self {
        Self {
            to,
            delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn after(to: Route, delay: Duration) -> Self {
        Self { to, delay }
    }
}

pub fn signup_succeeded(store: &CredentialStore, email: &str, now: DateTime<Utc>) -> Transition {
    store.begin_signup(email, now);
    info!("Signup accepted, OTP pending");
    Transition::after(Route::VerifyOtp, SIGNUP_REDIRECT_DELAY)
}

pub fn login_unverified(store: &CredentialStore, email: &str) -> Transition {
    store.mark_otp_pending(email);
    info!("Login blocked until email is verified");
    Transition::after(Route::VerifyPending, UNVERIFIED_REDIRECT_DELAY)
}

/// Stores the token and profile; flow markers are left alone.
pub fn login_succeeded(
    store: &CredentialStore,
    token: &SecretString,
    user: Option<&UserProfile>,
) -> Transition {
    store.set_token(token.expose_secret());
    if let Some(user) = user {
        store.cache_profile(user);
    }
    info!("Login succeeded");
    Transition::now(Route::Chat)
}

pub fn otp_verified(store: &CredentialStore) -> Transition {
    store.clear_flow_markers();
    info!("OTP verified");
    Transition::after(Route::Login, OTP_VERIFIED_REDIRECT_DELAY)
}

pub fn reset_link_sent() -> Transition {
    Transition::after(
        Route::Login,
        Duration::from_secs(u64::from(FORGOT_PASSWORD_REDIRECT_SECS)),
    )
}

pub fn reset_succeeded(store: &CredentialStore) -> Transition {
    store.clear_reset_marker();
    info!("Password updated");
    Transition::after(Route::Login, RESET_REDIRECT_DELAY)
}

pub fn signed_out(store: &CredentialStore) -> Transition {
    store.clear_session();
    info!("Signed out");
    Transition::now(Route::Login)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FlowMarker, MemoryScope, Origin};
    use std::sync::Arc;

    fn store() -> CredentialStore {
        let store = Origin::in_memory().open_tab(Arc::new(MemoryScope::new()));
        store.hydrate();
        store
    }

    #[test]
    fn signup_creates_marker() {
        let store = store();
        let t = signup_succeeded(&store, "ada@example.com", Utc::now());
        assert_eq!(t, Transition::after(Route::VerifyOtp, SIGNUP_REDIRECT_DELAY));
        assert!(store.has_marker(FlowMarker::OtpPending));
    }

    #[test]
    fn unverified_login_marks_otp_pending() {
        let store = store();
        let t = login_unverified(&store, "ada@example.com");
        assert_eq!(t.to, Route::VerifyPending);
        let marker = store.signup_marker().unwrap();
        assert_eq!(marker.email, "ada@example.com");
        assert!(marker.otp_pending);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn login_keeps_markers_and_caches_profile() {
        let store = store();
        store.store_reset_token("pending");
        let profile = UserProfile {
            email: Some("ada@example.com".to_string()),
            ..UserProfile::default()
        };

        let t = login_succeeded(&store, &SecretString::from("tok"), Some(&profile));
        assert_eq!(t, Transition::now(Route::Chat));
        assert!(store.is_authenticated());
        assert_eq!(store.cached_profile(), Some(profile));
        assert!(store.reset_marker().is_some());
    }

    #[test]
    fn otp_verified_clears_markers() {
        let store = store();
        store.begin_signup("ada@example.com", Utc::now());
        let t = otp_verified(&store);
        assert_eq!(t.to, Route::Login);
        assert!(store.signup_marker().is_none());
    }

    #[test]
    fn reset_success_clears_only_reset_marker() {
        let store = store();
        store.store_reset_token("XYZ");
        store.begin_signup("ada@example.com", Utc::now());
        let t = reset_succeeded(&store);
        assert_eq!(t, Transition::after(Route::Login, RESET_REDIRECT_DELAY));
        assert!(store.reset_marker().is_none());
        assert!(store.signup_marker().is_some());
    }

    #[test]
    fn sign_out_always_clears() {
        let store = store();
        store.set_token("abc");
        assert_eq!(signed_out(&store), Transition::now(Route::Login));
        assert!(store.get_token().is_none());
    }
}
