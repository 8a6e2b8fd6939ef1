//! Wire types for the auth and chat services.

use crate::device::DeviceMetadata;
use serde::{Deserialize, Serialize};

/// Action label the pending-verification page attaches to resend requests.
pub const RESEND_OTP_ACTION: &str = "RESEND_OTP";

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(flatten)]
    pub device: DeviceMetadata,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
    #[serde(flatten)]
    pub device: DeviceMetadata,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
    #[serde(flatten)]
    pub device: DeviceMetadata,
}

/// The OTP page sends the bare address; the pending page adds an action label
/// and device metadata.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendOtpRequest {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<&'static str>,
    #[serde(flatten)]
    pub device: Option<DeviceMetadata>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email: String,
    #[serde(flatten)]
    pub device: DeviceMetadata,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
    #[serde(flatten)]
    pub device: DeviceMetadata,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    #[serde(flatten)]
    pub device: DeviceMetadata,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub messages: &'a [ChatMessage],
    pub prompt: &'a str,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceContext, DeviceSignals, GeoInfo, RequestSource};
    use serde_json::json;

    fn metadata(source: RequestSource) -> DeviceMetadata {
        let signals = DeviceSignals::detect("Mozilla/5.0 (Windows NT 10.0) Chrome/120.0");
        DeviceContext::new(&signals, GeoInfo::default()).metadata(source)
    }

    #[test]
    fn reset_request_uses_camel_case_and_flattens_device() {
        let body = serde_json::to_value(ResetPasswordRequest {
            token: "XYZ".to_string(),
            new_password: "Secret1!".to_string(),
            device: metadata(RequestSource::ResetPassword),
        })
        .unwrap();
        assert_eq!(body["token"], json!("XYZ"));
        assert_eq!(body["newPassword"], json!("Secret1!"));
        assert_eq!(body["deviceName"], json!("Windows - Chrome"));
        assert_eq!(body["requestSource"], json!("WebResetPassword"));
    }

    #[test]
    fn bare_resend_is_email_only() {
        let body = serde_json::to_value(ResendOtpRequest {
            email: "ada@example.com".to_string(),
            action: None,
            device: None,
        })
        .unwrap();
        assert_eq!(body, json!({"email": "ada@example.com"}));
    }

    #[test]
    fn labelled_resend_carries_action_and_device() {
        let body = serde_json::to_value(ResendOtpRequest {
            email: "ada@example.com".to_string(),
            action: Some(RESEND_OTP_ACTION),
            device: Some(metadata(RequestSource::Unlabeled)),
        })
        .unwrap();
        assert_eq!(body["action"], json!("RESEND_OTP"));
        assert_eq!(body["ipAddress"], json!("unknown"));
    }

    #[test]
    fn chat_request_shape() {
        let history = vec![ChatMessage::user("hi"), ChatMessage::assistant("hello")];
        let body = serde_json::to_value(ChatRequest {
            messages: &history,
            prompt: "hi",
        })
        .unwrap();
        assert_eq!(
            body,
            json!({
                "messages": [
                    {"role": "user", "content": "hi"},
                    {"role": "assistant", "content": "hello"}
                ],
                "prompt": "hi"
            })
        );
    }
}
