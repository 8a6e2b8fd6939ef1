//! Best-effort OS / browser family from a user-agent string. Substring checks
//! run in a fixed order, so overlapping agents resolve to the first match.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Os {
    Windows,
    MacOs,
    Linux,
    Android,
    Ios,
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Browser {
    Edge,
    Chrome,
    Safari,
    Firefox,
    Unknown,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Windows => "Windows",
            Self::MacOs => "MacOS",
            Self::Linux => "Linux",
            Self::Android => "Android",
            Self::Ios => "iOS",
            Self::Unknown => "Unknown OS",
        })
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Edge => "Edge",
            Self::Chrome => "Chrome",
            Self::Safari => "Safari",
            Self::Firefox => "Firefox",
            Self::Unknown => "Unknown Browser",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceInfo {
    pub os: Os,
    pub browser: Browser,
}

impl DeviceInfo {
    /// `"<os> - <browser>"`, as reported to the auth service.
    #[must_use]
    pub fn device_name(&self) -> String {
        format!("{} - {}", self.os, self.browser)
    }
}

#[must_use]
pub fn classify(user_agent: &str) -> DeviceInfo {
    let lowered = user_agent.to_lowercase();

    let os = if user_agent.contains("Win") {
        Os::Windows
    } else if user_agent.contains("Mac") {
        Os::MacOs
    } else if user_agent.contains("Linux") {
        Os::Linux
    } else if lowered.contains("android") {
        Os::Android
    } else if ["iphone", "ipad", "ipod"]
        .iter()
        .any(|device| lowered.contains(device))
    {
        Os::Ios
    } else {
        Os::Unknown
    };

    let browser = if user_agent.contains("Edg") {
        Browser::Edge
    } else if user_agent.contains("Chrome") {
        Browser::Chrome
    } else if user_agent.contains("Safari") {
        Browser::Safari
    } else if user_agent.contains("Firefox") {
        Browser::Firefox
    } else {
        Browser::Unknown
    };

    DeviceInfo { os, browser }
}
