//! Ephemeral flow markers for the signup-verification and password-reset
//! processes. They live in the tab scope and gate the pages of those flows.

use super::{keys, CredentialStore};
use chrono::{DateTime, TimeZone, Utc};

/// Ephemeral keys a flow gate can require.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowMarker {
    SignupEmail,
    OtpPending,
    ResetToken,
}

impl FlowMarker {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::SignupEmail => keys::SIGNUP_EMAIL,
            Self::OtpPending => keys::OTP_PENDING,
            Self::ResetToken => keys::RESET_TOKEN,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignupFlowMarker {
    pub email: String,
    pub otp_pending: bool,
    pub otp_last_sent_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResetFlowMarker {
    pub reset_token: String,
}

impl CredentialStore {
    /// A marker is present when its key holds a non-empty value.
    #[must_use]
    pub fn has_marker(&self, marker: FlowMarker) -> bool {
        self.ephemeral()
            .get(marker.key())
            .is_some_and(|value| !value.trim().is_empty())
    }

    #[must_use]
    pub fn signup_marker(&self) -> Option<SignupFlowMarker> {
        let scope = self.ephemeral();
        let email = scope.get(keys::SIGNUP_EMAIL).unwrap_or_default();
        let otp_pending = self.has_marker(FlowMarker::OtpPending);
        let otp_last_sent_at = scope
            .get(keys::OTP_LAST_SENT_AT)
            .and_then(|millis| millis.parse::<i64>().ok())
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single());

        if email.is_empty() && !otp_pending {
            return None;
        }

        Some(SignupFlowMarker {
            email,
            otp_pending,
            otp_last_sent_at,
        })
    }

    /// Signup accepted: remember the address and that an OTP went out at `now`.
    pub fn begin_signup(&self, email: &str, now: DateTime<Utc>) {
        self.mark_otp_pending(email);
        self.stamp_otp_sent(now);
    }

    /// Login reported an unverified account; the OTP flow must be reachable.
    pub fn mark_otp_pending(&self, email: &str) {
        let scope = self.ephemeral();
        scope.set(keys::SIGNUP_EMAIL, email);
        scope.set(keys::OTP_PENDING, "true");
    }

    pub fn stamp_otp_sent(&self, at: DateTime<Utc>) {
        self.ephemeral()
            .set(keys::OTP_LAST_SENT_AT, &at.timestamp_millis().to_string());
    }

    /// Clears every marker in this tab, including the reset marker.
    pub fn clear_flow_markers(&self) {
        self.ephemeral().clear();
    }

    #[must_use]
    pub fn reset_marker(&self) -> Option<ResetFlowMarker> {
        self.ephemeral()
            .get(keys::RESET_TOKEN)
            .filter(|token| !token.trim().is_empty())
            .map(|reset_token| ResetFlowMarker { reset_token })
    }

    /// Persists the reset token from the emailed link, overwriting any stale one.
    pub fn store_reset_token(&self, token: &str) {
        self.ephemeral().set(keys::RESET_TOKEN, token);
    }

    pub fn clear_reset_marker(&self) {
        self.ephemeral().remove(keys::RESET_TOKEN);
    }

    /// Returns `true` the first time it is called in a tab.
    pub fn take_intro(&self) -> bool {
        let scope = self.ephemeral();
        if scope.get(keys::INTRO_SHOWN).is_some() {
            return false;
        }
        scope.set(keys::INTRO_SHOWN, "true");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryScope, Origin};
    use std::sync::Arc;

    fn store() -> CredentialStore {
        let store = Origin::in_memory().open_tab(Arc::new(MemoryScope::new()));
        store.hydrate();
        store
    }

    #[test]
    fn signup_marker_roundtrip() {
        let store = store();
        assert!(store.signup_marker().is_none());

        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        store.begin_signup("ada@example.com", now);

        let marker = store.signup_marker().unwrap();
        assert_eq!(marker.email, "ada@example.com");
        assert!(marker.otp_pending);
        assert_eq!(marker.otp_last_sent_at, Some(now));
        assert!(store.has_marker(FlowMarker::OtpPending));
        assert!(store.has_marker(FlowMarker::SignupEmail));
    }

    #[test]
    fn reset_marker_overwrites_stale_token() {
        let store = store();
        store.store_reset_token("old");
        store.store_reset_token("new");
        assert_eq!(
            store.reset_marker(),
            Some(ResetFlowMarker {
                reset_token: "new".to_string()
            })
        );

        store.clear_reset_marker();
        assert!(store.reset_marker().is_none());
        assert!(!store.has_marker(FlowMarker::ResetToken));
    }

    #[test]
    fn clear_flow_markers_keeps_session() {
        let store = store();
        store.set_token("abc");
        store.begin_signup("ada@example.com", Utc::now());
        store.clear_flow_markers();

        assert!(store.signup_marker().is_none());
        assert!(store.is_authenticated());
    }

    #[test]
    fn intro_is_taken_once_per_tab() {
        let store = store();
        assert!(store.take_intro());
        assert!(!store.take_intro());
    }
}
