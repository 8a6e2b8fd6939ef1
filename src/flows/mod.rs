//! Page controllers. Each one validates input, collects device context, calls
//! one gateway endpoint and applies the resulting store transition. Failures
//! never escape: they become a [`Notice`] for the page to show.

mod chat;
mod login;
mod password;
mod signup;
mod verify;

pub use chat::{sign_out, ChatSession, EMPTY_REPLY, UNREACHABLE_REPLY};
pub use login::LoginPage;
pub use password::{ForgotPasswordPage, ResetPasswordPage};
pub use signup::{SignupForm, SignupPage};
pub use verify::{mask_email, VerifyOtpPage, VerifyPendingPage};

use crate::{
    config::AppConfig,
    device::{DeviceCollector, DeviceSignals},
    error::AppError,
    gateway::{http_client, ApiClient, AuthClient, ChatClient},
    session::Transition,
    APP_USER_AGENT,
};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Success(String),
    Error(String),
}

impl Notice {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Info(text) | Self::Success(text) | Self::Error(text) => text,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// What a page shows after an action, and where it goes next if anywhere.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Submission {
    pub notice: Option<Notice>,
    pub transition: Option<Transition>,
}

impl Submission {
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            notice: Some(Notice::Error(message.into())),
            transition: None,
        }
    }

    #[must_use]
    pub fn notice(notice: Notice) -> Self {
        Self {
            notice: Some(notice),
            transition: None,
        }
    }

    #[must_use]
    pub fn then(mut self, transition: Transition) -> Self {
        self.transition = Some(transition);
        self
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.notice.as_ref().is_some_and(Notice::is_error)
    }
}

/// Gateways and the device collector shared by every page.
#[derive(Clone, Debug)]
pub struct Backends {
    pub auth: AuthClient,
    pub chat: ChatClient,
    pub device: DeviceCollector,
}

impl Backends {
    /// # Errors
    /// Returns `AppError::Config` when the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let http = http_client(config.request_timeout)?;
        Ok(Self {
            auth: AuthClient::new(ApiClient::new(http.clone(), config.auth_base_url.clone())),
            chat: ChatClient::new(ApiClient::new(http.clone(), config.chat_base_url.clone())),
            device: DeviceCollector::new(
                http,
                config.geo_url.clone(),
                DeviceSignals::detect(APP_USER_AGENT)
                    .with_screen(config.screen.0, config.screen.1),
            ),
        })
    }
}

/// Picks the backend message, or `fallback` when it sent none.
fn backend_message(message: Option<&str>, fallback: &str) -> String {
    message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(fallback)
        .to_string()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::store::{CredentialStore, MemoryScope, Origin};
    use std::{sync::Arc, time::Duration};
    use url::Url;
    use wiremock::MockServer;

    pub fn store() -> Arc<CredentialStore> {
        let store = Origin::in_memory().open_tab(Arc::new(MemoryScope::new()));
        store.hydrate();
        Arc::new(store)
    }

    /// Auth under `/api/`, chat under `/chat/`, geolocation at `/json/`.
    pub fn backends(server: &MockServer) -> Backends {
        let config = AppConfig {
            auth_base_url: Url::parse(&format!("{}/api/", server.uri())).unwrap(),
            chat_base_url: Url::parse(&format!("{}/chat/", server.uri())).unwrap(),
            geo_url: Url::parse(&format!("{}/json/", server.uri())).unwrap(),
            state_dir: std::env::temp_dir(),
            tab: "test".to_string(),
            request_timeout: Duration::from_secs(2),
            screen: (1280, 720),
        };
        Backends::from_config(&config).unwrap()
    }
}
