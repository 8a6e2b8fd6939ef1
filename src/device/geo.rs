use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

pub const UNKNOWN: &str = "unknown";

/// Coarse IP geolocation. Informational only; never gates anything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeoInfo {
    pub ip: String,
    pub city: String,
    pub region: String,
    pub country: String,
    pub latitude: String,
    pub longitude: String,
}

impl Default for GeoInfo {
    fn default() -> Self {
        Self {
            ip: UNKNOWN.to_string(),
            city: UNKNOWN.to_string(),
            region: UNKNOWN.to_string(),
            country: UNKNOWN.to_string(),
            latitude: String::new(),
            longitude: String::new(),
        }
    }
}

/// Accepts both the third-party shape (`country_name`, numeric coordinates)
/// and the auth service `/geo` shape (`country`).
#[derive(Debug, Default, Deserialize)]
struct GeoResponse {
    ip: Option<String>,
    city: Option<String>,
    region: Option<String>,
    country: Option<String>,
    country_name: Option<String>,
    latitude: Option<Value>,
    longitude: Option<Value>,
}

impl From<GeoResponse> for GeoInfo {
    fn from(response: GeoResponse) -> Self {
        let fallback = Self::default();
        Self {
            ip: non_empty(response.ip).unwrap_or(fallback.ip),
            city: non_empty(response.city).unwrap_or(fallback.city),
            region: non_empty(response.region).unwrap_or(fallback.region),
            country: non_empty(response.country_name)
                .or_else(|| non_empty(response.country))
                .unwrap_or(fallback.country),
            latitude: coordinate(response.latitude),
            longitude: coordinate(response.longitude),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn coordinate(value: Option<Value>) -> String {
    match value {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s,
        _ => String::new(),
    }
}

/// Looks up the caller's location, substituting placeholders on any failure.
pub async fn locate(http: &reqwest::Client, url: &Url) -> GeoInfo {
    let response = match http.get(url.clone()).send().await {
        Ok(response) if response.status().is_success() => response,
        Ok(response) => {
            warn!(status = %response.status(), "Geolocation lookup rejected");
            return GeoInfo::default();
        }
        Err(err) => {
            warn!("Geolocation lookup failed: {err}");
            return GeoInfo::default();
        }
    };

    match response.json::<GeoResponse>().await {
        Ok(body) => {
            let geo = GeoInfo::from(body);
            debug!(country = %geo.country, "Resolved geolocation");
            geo
        }
        Err(err) => {
            warn!("Geolocation response unreadable: {err}");
            GeoInfo::default()
        }
    }
}
