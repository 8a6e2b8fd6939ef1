//! HTTP helpers for JSON APIs with consistent timeouts and error handling. The
//! auth and chat clients use these to avoid duplicating request setup. The
//! helpers never store tokens; they only attach the bearer a caller passes in.

use crate::{error::AppError, APP_USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use url::Url;

/// Maximum number of error body characters surfaced to the user.
const MAX_ERROR_CHARS: usize = 200;

/// Builds the shared HTTP client with the request timeout applied.
///
/// # Errors
/// Returns `AppError::Config` when the TLS backend cannot be initialized.
pub fn http_client(timeout: Duration) -> Result<Client, AppError> {
    Client::builder()
        .user_agent(APP_USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|err| AppError::Config(format!("Failed to build HTTP client: {err}")))
}

/// One backend, addressed by its base URL.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    #[must_use]
    pub fn new(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    #[must_use]
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Joins `path` under the base URL.
    ///
    /// # Errors
    /// Returns `AppError::Config` when the path cannot be joined.
    pub fn url(&self, path: &str) -> Result<Url, AppError> {
        self.base_url
            .join(path.trim().trim_start_matches('/'))
            .map_err(|err| AppError::Config(format!("Invalid endpoint {path}: {err}")))
    }

    /// Posts JSON and parses a JSON response; non-2xx is an error.
    ///
    /// # Errors
    /// Network, timeout, HTTP status and decoding failures.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        bearer: Option<&SecretString>,
    ) -> Result<T, AppError> {
        let request = with_bearer(self.http.post(self.url(path)?).json(body), bearer);
        let response = request.send().await.map_err(map_request_error)?;
        handle_json_response(response).await
    }

    /// Posts JSON and decodes the body whatever the status, for APIs that
    /// report outcomes in the payload. Only an undecodable non-2xx body is an
    /// HTTP error.
    ///
    /// # Errors
    /// Network, timeout, HTTP status and decoding failures.
    pub async fn post_json_any_status<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        bearer: Option<&SecretString>,
    ) -> Result<(StatusCode, T), AppError> {
        let request = with_bearer(self.http.post(self.url(path)?).json(body), bearer);
        let response = request.send().await.map_err(map_request_error)?;
        handle_any_status_response(response).await
    }

    /// Posts JSON and ignores the response body; non-2xx is an error.
    ///
    /// # Errors
    /// Network, timeout and HTTP status failures.
    pub async fn post_json_empty<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        bearer: Option<&SecretString>,
    ) -> Result<(), AppError> {
        let request = with_bearer(self.http.post(self.url(path)?).json(body), bearer);
        let response = request.send().await.map_err(map_request_error)?;
        handle_empty_response(response).await
    }
}

fn with_bearer(request: RequestBuilder, bearer: Option<&SecretString>) -> RequestBuilder {
    match bearer {
        Some(token) => request.bearer_auth(token.expose_secret()),
        None => request,
    }
}

/// Maps transport errors into user-facing `AppError` variants.
fn map_request_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Timeout("Request timed out. Please try again.".to_string())
    } else {
        AppError::Network(format!("Unable to reach the server: {err}"))
    }
}

async fn read_body(response: Response) -> Result<(StatusCode, String), AppError> {
    let status = response.status();
    let body = response.text().await.map_err(map_request_error)?;
    Ok((status, body))
}

/// Parses JSON responses and surfaces HTTP errors with sanitized bodies.
async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    let (status, body) = read_body(response).await?;
    if status.is_success() {
        serde_json::from_str(&body)
            .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
    } else {
        Err(AppError::Http {
            status: status.as_u16(),
            message: sanitize_body(&body),
        })
    }
}

async fn handle_any_status_response<T: DeserializeOwned>(
    response: Response,
) -> Result<(StatusCode, T), AppError> {
    let (status, body) = read_body(response).await?;
    match serde_json::from_str(&body) {
        Ok(value) => Ok((status, value)),
        Err(err) if status.is_success() => Err(AppError::Parse(format!(
            "Failed to decode response: {err}"
        ))),
        Err(_) => Err(AppError::Http {
            status: status.as_u16(),
            message: sanitize_body(&body),
        }),
    }
}

async fn handle_empty_response(response: Response) -> Result<(), AppError> {
    let (status, body) = read_body(response).await?;
    if status.is_success() {
        Ok(())
    } else {
        Err(AppError::Http {
            status: status.as_u16(),
            message: sanitize_body(&body),
        })
    }
}

/// Trims and truncates HTTP error bodies for display.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ApiClient {
        let base = Url::parse(&format!("{}/api/", server.uri())).unwrap();
        ApiClient::new(http_client(Duration::from_secs(2)).unwrap(), base)
    }

    #[test]
    fn sanitize_body_trims_and_truncates() {
        assert_eq!(sanitize_body("   "), "Request failed.");
        assert_eq!(sanitize_body(" nope \n"), "nope");
        assert_eq!(sanitize_body(&"x".repeat(500)).len(), MAX_ERROR_CHARS);
    }

    #[test]
    fn url_joins_under_base() {
        let api = ApiClient::new(
            Client::new(),
            Url::parse("http://localhost:5000/api/").unwrap(),
        );
        assert_eq!(
            api.url("/login").unwrap().as_str(),
            "http://localhost:5000/api/login"
        );
        assert_eq!(
            api.url("v1/chat").unwrap().as_str(),
            "http://localhost:5000/api/v1/chat"
        );
    }

    #[tokio::test]
    async fn post_json_sends_bearer_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/echo"))
            .and(header("authorization", "Bearer tok"))
            .and(body_json(json!({"hello": "world"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let token = SecretString::from("tok");
        let value: Value = client(&server)
            .post_json("/echo", &json!({"hello": "world"}), Some(&token))
            .await
            .unwrap();
        assert_eq!(value, json!({"ok": true}));
    }

    #[tokio::test]
    async fn post_json_maps_status_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/echo"))
            .respond_with(ResponseTemplate::new(503).set_body_string("  down for maintenance "))
            .mount(&server)
            .await;

        let result: Result<Value, _> = client(&server).post_json("/echo", &json!({}), None).await;
        match result {
            Err(AppError::Http { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "down for maintenance");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn any_status_decodes_error_bodies() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(
                ResponseTemplate::new(423).set_body_json(json!({"locked": true})),
            )
            .mount(&server)
            .await;

        let (status, value): (StatusCode, Value) = client(&server)
            .post_json_any_status("/login", &json!({}), None)
            .await
            .unwrap();
        assert_eq!(status.as_u16(), 423);
        assert_eq!(value["locked"], json!(true));
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let api = ApiClient::new(
            http_client(Duration::from_secs(2)).unwrap(),
            Url::parse("http://127.0.0.1:9/api/").unwrap(),
        );
        let result = api.post_json_empty("/logout", &json!({}), None).await;
        assert!(matches!(result, Err(AppError::Network(_))));
    }

    #[tokio::test]
    async fn slow_server_is_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let base = Url::parse(&format!("{}/api/", server.uri())).unwrap();
        let api = ApiClient::new(http_client(Duration::from_millis(200)).unwrap(), base);
        let result = api.post_json_empty("/slow", &json!({}), None).await;
        assert!(matches!(result, Err(AppError::Timeout(_))));
    }
}
