//! Auth responses are discriminated by payload fields, not by HTTP status.
//! They are decoded exactly once into [`AuthOutcome`]; nothing downstream
//! inspects the raw envelope.

use crate::{session::DEFAULT_LOCKOUT_SECS, store::UserProfile};
use reqwest::StatusCode;
use secrecy::SecretString;
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub locked: Option<bool>,
    #[serde(default)]
    pub remaining_seconds: Option<serde_json::Number>,
    #[serde(default)]
    pub unverified: Option<bool>,
}

#[derive(Clone, Debug)]
pub enum AuthOutcome {
    Success {
        token: Option<SecretString>,
        user: Option<UserProfile>,
        message: Option<String>,
    },
    /// Lockout is a state, not an error; the countdown is advisory.
    Locked {
        remaining_seconds: u32,
        message: Option<String>,
    },
    Unverified {
        message: Option<String>,
    },
    Rejected {
        message: Option<String>,
    },
}

impl AuthOutcome {
    /// Precedence: locked, unverified, success (2xx only), rejected.
    #[must_use]
    pub fn decode(status: StatusCode, envelope: AuthEnvelope) -> Self {
        let message = envelope.message.filter(|m| !m.trim().is_empty());

        if envelope.locked == Some(true) {
            return Self::Locked {
                remaining_seconds: lockout_seconds(envelope.remaining_seconds.as_ref()),
                message,
            };
        }
        if envelope.unverified == Some(true) {
            return Self::Unverified { message };
        }
        if envelope.success == Some(true) && status.is_success() {
            let token = envelope
                .token
                .map(|token| token.trim().to_string())
                .filter(|token| !token.is_empty())
                .map(SecretString::from);
            return Self::Success {
                token,
                user: envelope.user,
                message,
            };
        }
        Self::Rejected { message }
    }

    /// Login also treats any unlocked response whose message asks to "verify"
    /// as unverified, even a success, and a success without a token as a
    /// rejection.
    #[must_use]
    pub fn decode_login(status: StatusCode, envelope: AuthEnvelope) -> Self {
        let asks_to_verify = envelope
            .message
            .as_deref()
            .is_some_and(|m| m.contains("verify"));

        match Self::decode(status, envelope) {
            Self::Success { message, .. } | Self::Rejected { message } if asks_to_verify => {
                Self::Unverified { message }
            }
            Self::Success {
                token: None,
                message,
                ..
            } => Self::Rejected { message },
            outcome => outcome,
        }
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { message, .. }
            | Self::Locked { message, .. }
            | Self::Unverified { message }
            | Self::Rejected { message } => message.as_deref(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Missing, zero or unreadable values fall back to the default lockout.
fn lockout_seconds(raw: Option<&serde_json::Number>) -> u32 {
    let seconds = raw.and_then(|n| {
        n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f > 0.0)
                .map(|f| f.ceil() as u64)
        })
    });
    match seconds {
        Some(0) | None => DEFAULT_LOCKOUT_SECS,
        Some(s) => u32::try_from(s).unwrap_or(u32::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serde_json::json;

    fn envelope(value: serde_json::Value) -> AuthEnvelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn locked_wins_over_everything() {
        let outcome = AuthOutcome::decode(
            StatusCode::OK,
            envelope(json!({"locked": true, "remainingSeconds": 45, "success": true, "unverified": true})),
        );
        assert!(matches!(
            outcome,
            AuthOutcome::Locked {
                remaining_seconds: 45,
                ..
            }
        ));
    }

    #[test]
    fn locked_without_seconds_uses_default() {
        let outcome = AuthOutcome::decode(StatusCode::FORBIDDEN, envelope(json!({"locked": true})));
        assert!(matches!(
            outcome,
            AuthOutcome::Locked {
                remaining_seconds: DEFAULT_LOCKOUT_SECS,
                ..
            }
        ));

        let outcome = AuthOutcome::decode(
            StatusCode::OK,
            envelope(json!({"locked": true, "remainingSeconds": 12.2})),
        );
        assert!(matches!(
            outcome,
            AuthOutcome::Locked {
                remaining_seconds: 13,
                ..
            }
        ));
    }

    #[test]
    fn success_requires_2xx() {
        let body = json!({"success": true, "token": "abc"});
        assert!(AuthOutcome::decode(StatusCode::OK, envelope(body.clone())).is_success());
        assert!(matches!(
            AuthOutcome::decode(StatusCode::BAD_REQUEST, envelope(body)),
            AuthOutcome::Rejected { .. }
        ));
    }

    #[test]
    fn rejected_keeps_backend_message() {
        let outcome = AuthOutcome::decode(
            StatusCode::UNAUTHORIZED,
            envelope(json!({"success": false, "message": "Wrong password"})),
        );
        assert_eq!(outcome.message(), Some("Wrong password"));
    }

    #[test]
    fn login_verify_message_means_unverified() {
        let outcome = AuthOutcome::decode_login(
            StatusCode::FORBIDDEN,
            envelope(json!({"success": false, "message": "Please verify your email"})),
        );
        assert!(matches!(outcome, AuthOutcome::Unverified { .. }));

        // other endpoints take the message at face value
        let outcome = AuthOutcome::decode(
            StatusCode::FORBIDDEN,
            envelope(json!({"success": false, "message": "Please verify your email"})),
        );
        assert!(matches!(outcome, AuthOutcome::Rejected { .. }));
    }

    #[test]
    fn login_verify_message_outranks_success() {
        let outcome = AuthOutcome::decode_login(
            StatusCode::OK,
            envelope(json!({
                "success": true,
                "token": "abc",
                "message": "Please verify your email first"
            })),
        );
        assert!(matches!(outcome, AuthOutcome::Unverified { .. }));

        // lockout still comes first
        let outcome = AuthOutcome::decode_login(
            StatusCode::LOCKED,
            envelope(json!({"locked": true, "message": "verify later"})),
        );
        assert!(matches!(outcome, AuthOutcome::Locked { .. }));
    }

    #[test]
    fn login_success_without_token_is_rejected() {
        let outcome =
            AuthOutcome::decode_login(StatusCode::OK, envelope(json!({"success": true, "token": " "})));
        assert!(matches!(outcome, AuthOutcome::Rejected { message: None }));
    }

    #[test]
    fn login_success_carries_token_and_profile() {
        let outcome = AuthOutcome::decode_login(
            StatusCode::OK,
            envelope(json!({
                "success": true,
                "token": "abc",
                "user": {"name": "Ada", "email": "ada@example.com", "plan": "pro"}
            })),
        );
        let AuthOutcome::Success {
            token: Some(token),
            user: Some(user),
            ..
        } = outcome
        else {
            panic!("expected success");
        };
        assert_eq!(token.expose_secret(), "abc");
        assert_eq!(user.name.as_deref(), Some("Ada"));
        assert_eq!(user.extra["plan"], json!("pro"));
    }
}
