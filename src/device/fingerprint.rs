use base64ct::{Base64, Encoding};
use std::env;

/// Length of the opaque fingerprint token.
pub const FINGERPRINT_LEN: usize = 32;

/// Coarse, non-unique display and locale signals. Collisions and spoofing are
/// expected; the result is an anti-fraud hint for the backend only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceSignals {
    pub user_agent: String,
    pub language: String,
    pub screen_width: u32,
    pub screen_height: u32,
    pub timezone: String,
}

impl DeviceSignals {
    /// Reads locale and timezone from `LANG` / `TZ`. A terminal has no screen,
    /// so dimensions stay zero unless set by the caller.
    #[must_use]
    pub fn detect(user_agent: &str) -> Self {
        let language = env::var("LANG")
            .ok()
            .and_then(|lang| language_tag(&lang))
            .unwrap_or_else(|| "en-US".to_string());
        let timezone = env::var("TZ")
            .ok()
            .map(|tz| tz.trim().trim_start_matches(':').to_string())
            .filter(|tz| !tz.is_empty())
            .unwrap_or_else(|| "UTC".to_string());

        Self {
            user_agent: user_agent.to_string(),
            language,
            screen_width: 0,
            screen_height: 0,
            timezone,
        }
    }

    #[must_use]
    pub fn with_screen(mut self, width: u32, height: u32) -> Self {
        self.screen_width = width;
        self.screen_height = height;
        self
    }

    /// Base64 of the concatenated signals, cut to [`FINGERPRINT_LEN`].
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let data = format!(
            "{}{}{}{}{}",
            self.user_agent, self.language, self.screen_width, self.screen_height, self.timezone
        );
        Base64::encode_string(data.as_bytes())
            .chars()
            .take(FINGERPRINT_LEN)
            .collect()
    }
}

/// `en_US.UTF-8` -> `en-US`
fn language_tag(lang: &str) -> Option<String> {
    let tag = lang.split(['.', '@']).next()?.trim().replace('_', "-");
    if tag.is_empty() || tag == "C" || tag == "POSIX" {
        None
    } else {
        Some(tag)
    }
}
