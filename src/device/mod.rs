//! Device context attached to auth requests: fingerprint, OS/browser family
//! and coarse geolocation. Shared by every auth flow; none of it gates access.

mod agent;
mod fingerprint;
mod geo;

pub use agent::{classify, Browser, DeviceInfo, Os};
pub use fingerprint::{DeviceSignals, FINGERPRINT_LEN};
pub use geo::{locate, GeoInfo};

use serde::Serialize;
use url::Url;

/// Which form the request originates from; the backend records it verbatim.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestSource {
    Web,
    ForgotPassword,
    ResetPassword,
    /// No source field is sent.
    Unlabeled,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceContext {
    pub user_agent: String,
    pub fingerprint: String,
    pub info: DeviceInfo,
    pub geo: GeoInfo,
}

/// camelCase metadata flattened into auth request bodies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceMetadata {
    pub user_agent: String,
    pub device_name: String,
    pub device_os: String,
    pub device_fingerprint: String,
    pub ip_address: String,
    pub geo_city: String,
    pub geo_region: String,
    pub geo_country: String,
    pub geo_latitude: String,
    pub geo_longitude: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_source: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_source: Option<&'static str>,
}

impl DeviceContext {
    #[must_use]
    pub fn new(signals: &DeviceSignals, geo: GeoInfo) -> Self {
        Self {
            user_agent: signals.user_agent.clone(),
            fingerprint: signals.fingerprint(),
            info: classify(&signals.user_agent),
            geo,
        }
    }

    #[must_use]
    pub fn metadata(&self, source: RequestSource) -> DeviceMetadata {
        let (registration_source, request_source) = match source {
            RequestSource::Web => (Some("Web"), None),
            RequestSource::ForgotPassword => (Some("ForgotPassword"), None),
            RequestSource::ResetPassword => (None, Some("WebResetPassword")),
            RequestSource::Unlabeled => (None, None),
        };

        DeviceMetadata {
            user_agent: self.user_agent.clone(),
            device_name: self.info.device_name(),
            device_os: self.info.os.to_string(),
            device_fingerprint: self.fingerprint.clone(),
            ip_address: self.geo.ip.clone(),
            geo_city: self.geo.city.clone(),
            geo_region: self.geo.region.clone(),
            geo_country: self.geo.country.clone(),
            geo_latitude: self.geo.latitude.clone(),
            geo_longitude: self.geo.longitude.clone(),
            registration_source,
            request_source,
        }
    }
}

/// Gathers a [`DeviceContext`] once per page submission.
#[derive(Clone, Debug)]
pub struct DeviceCollector {
    http: reqwest::Client,
    geo_url: Url,
    signals: DeviceSignals,
}

impl DeviceCollector {
    #[must_use]
    pub fn new(http: reqwest::Client, geo_url: Url, signals: DeviceSignals) -> Self {
        Self {
            http,
            geo_url,
            signals,
        }
    }

    /// Fingerprint and agent info are local; geolocation may degrade to
    /// placeholders but never fails the collection.
    pub async fn collect(&self) -> DeviceContext {
        let geo = locate(&self.http, &self.geo_url).await;
        DeviceContext::new(&self.signals, geo)
    }

    /// Context with a location resolved elsewhere (the auth service `/geo`).
    #[must_use]
    pub fn with_geo(&self, geo: GeoInfo) -> DeviceContext {
        DeviceContext::new(&self.signals, geo)
    }

    /// Context without the network lookup, for requests that only carry
    /// placeholders (signout).
    #[must_use]
    pub fn local(&self) -> DeviceContext {
        self.with_geo(GeoInfo::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context() -> DeviceContext {
        let signals = DeviceSignals {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) Firefox/121.0".to_string(),
            language: "en-US".to_string(),
            screen_width: 1920,
            screen_height: 1080,
            timezone: "UTC".to_string(),
        };
        DeviceContext::new(&signals, GeoInfo::default())
    }

    #[test]
    fn metadata_shape_for_web_source() {
        let value = serde_json::to_value(context().metadata(RequestSource::Web)).unwrap();
        assert_eq!(value["deviceName"], json!("Linux - Firefox"));
        assert_eq!(value["deviceOs"], json!("Linux"));
        assert_eq!(value["ipAddress"], json!("unknown"));
        assert_eq!(value["registrationSource"], json!("Web"));
        assert!(value.get("requestSource").is_none());
        assert_eq!(
            value["deviceFingerprint"].as_str().map(str::len),
            Some(FINGERPRINT_LEN)
        );
    }

    #[test]
    fn metadata_source_labels() {
        let ctx = context();
        let reset = serde_json::to_value(ctx.metadata(RequestSource::ResetPassword)).unwrap();
        assert_eq!(reset["requestSource"], json!("WebResetPassword"));
        assert!(reset.get("registrationSource").is_none());

        let none = serde_json::to_value(ctx.metadata(RequestSource::Unlabeled)).unwrap();
        assert!(none.get("requestSource").is_none());
        assert!(none.get("registrationSource").is_none());
    }
}
