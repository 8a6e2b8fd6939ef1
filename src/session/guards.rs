//! Route gates. UX-only: the backends remain the authority on access; these
//! predicates only decide what the client renders.

use super::route::{Location, Route};
use crate::store::{CredentialStore, FlowMarker};

/// Query parameter carrying the reset token in emailed links.
pub const RESET_TOKEN_PARAM: &str = "token";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    /// Authentication status not known yet; render nothing.
    Suspend,
    Redirect(Route),
}

/// Guards the chat route.
#[must_use]
pub fn protected_gate(store: &CredentialStore) -> GateDecision {
    if store.is_loading() {
        return GateDecision::Suspend;
    }
    if store.is_authenticated() {
        GateDecision::Allow
    } else {
        GateDecision::Redirect(Route::Login)
    }
}

/// Guards marker-dependent pages. The reset flow is also satisfied by a URL
/// token so the first visit from an emailed link gets through before the
/// marker exists.
#[must_use]
pub fn flow_gate(store: &CredentialStore, marker: FlowMarker, location: &Location) -> GateDecision {
    if marker == FlowMarker::ResetToken && location.query(RESET_TOKEN_PARAM).is_some() {
        return GateDecision::Allow;
    }
    if store.has_marker(marker) {
        GateDecision::Allow
    } else {
        GateDecision::Redirect(Route::Login)
    }
}

/// Guards OTP verification; without a pending OTP the visitor goes back to signup.
#[must_use]
pub fn otp_gate(store: &CredentialStore) -> GateDecision {
    if store.has_marker(FlowMarker::OtpPending) {
        GateDecision::Allow
    } else {
        GateDecision::Redirect(Route::Signup)
    }
}

/// Picks and evaluates the gate for a location.
#[must_use]
pub fn evaluate(store: &CredentialStore, location: &Location) -> GateDecision {
    match location.route() {
        Route::Chat => protected_gate(store),
        Route::VerifyOtp => otp_gate(store),
        Route::VerifyPending => flow_gate(store, FlowMarker::SignupEmail, location),
        Route::ResetPassword => flow_gate(store, FlowMarker::ResetToken, location),
        Route::Login | Route::Signup | Route::ForgotPassword => GateDecision::Allow,
    }
}
