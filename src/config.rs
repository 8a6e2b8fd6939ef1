//! Endpoint and storage configuration. Defaults point at a local development
//! stack; each value can be overridden from the command line or environment.
//! Blank overrides are ignored so an empty env var never wipes a default.
//! Configuration values are public; do not store secrets here.

use crate::error::AppError;
use std::{path::PathBuf, time::Duration};
use url::Url;

pub const DEFAULT_AUTH_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_CHAT_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_GEO_URL: &str = "https://ipapi.co/json/";
pub const DEFAULT_TAB: &str = "default";
/// Default request timeout (seconds) applied to every gateway call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub auth_base_url: Url,
    pub chat_base_url: Url,
    pub geo_url: Url,
    pub state_dir: PathBuf,
    pub tab: String,
    pub request_timeout: Duration,
    /// Reported screen size in pixels; a terminal has none, so `0x0` by default.
    pub screen: (u32, u32),
}

/// Raw values as they arrive from the CLI or environment.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub auth_base_url: Option<String>,
    pub chat_base_url: Option<String>,
    pub geo_url: Option<String>,
    pub state_dir: Option<String>,
    pub tab: Option<String>,
    pub request_timeout_secs: Option<u64>,
    /// `WIDTHxHEIGHT`, e.g. `1920x1080`.
    pub screen: Option<String>,
}

impl AppConfig {
    /// Resolves overrides on top of the defaults and validates every URL.
    ///
    /// # Errors
    /// Returns `AppError::Config` when an endpoint is not a valid absolute URL
    /// or the screen size is not `WIDTHxHEIGHT`.
    pub fn load(overrides: ConfigOverrides) -> Result<Self, AppError> {
        let auth = pick(overrides.auth_base_url, DEFAULT_AUTH_URL);
        let chat = pick(overrides.chat_base_url, DEFAULT_CHAT_URL);
        let geo = pick(overrides.geo_url, DEFAULT_GEO_URL);

        let state_dir = overrides
            .state_dir
            .as_deref()
            .and_then(normalize_value)
            .map_or_else(default_state_dir, PathBuf::from);

        let tab = pick(overrides.tab, DEFAULT_TAB);
        if tab.contains(['/', '\\']) || tab.starts_with('.') {
            return Err(AppError::Config(format!("invalid tab name: {tab}")));
        }

        let screen = match overrides.screen.as_deref().and_then(normalize_value) {
            Some(value) => parse_screen(&value)?,
            None => (0, 0),
        };

        Ok(Self {
            auth_base_url: parse_base_url("auth", &auth)?,
            chat_base_url: parse_base_url("chat", &chat)?,
            geo_url: Url::parse(&geo)
                .map_err(|err| AppError::Config(format!("invalid geo URL {geo}: {err}")))?,
            state_dir,
            tab,
            request_timeout: Duration::from_secs(
                overrides
                    .request_timeout_secs
                    .filter(|secs| *secs > 0)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            screen,
        })
    }

    /// File backing the durable (origin-wide) scope.
    #[must_use]
    pub fn durable_path(&self) -> PathBuf {
        self.state_dir.join("durable.json")
    }

    /// File backing this tab's ephemeral scope.
    #[must_use]
    pub fn tab_path(&self) -> PathBuf {
        self.state_dir.join("tabs").join(format!("{}.json", self.tab))
    }
}

/// `~/.chatgate`, or `./.chatgate` when no home directory is known.
#[must_use]
pub fn default_state_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".chatgate")
}

fn pick(value: Option<String>, default: &str) -> String {
    value
        .as_deref()
        .and_then(normalize_value)
        .unwrap_or_else(|| default.to_string())
}

/// Base URLs always end with `/` so `Url::join` appends instead of replacing
/// the last path segment.
fn parse_base_url(name: &str, value: &str) -> Result<Url, AppError> {
    let mut normalized = value.trim_end_matches('/').to_string();
    normalized.push('/');
    Url::parse(&normalized)
        .map_err(|err| AppError::Config(format!("invalid {name} URL {value}: {err}")))
}

fn parse_screen(value: &str) -> Result<(u32, u32), AppError> {
    value
        .split_once(['x', 'X'])
        .and_then(|(width, height)| Some((width.trim().parse().ok()?, height.trim().parse().ok()?)))
        .ok_or_else(|| AppError::Config(format!("invalid screen size {value}: expected WIDTHxHEIGHT")))
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
