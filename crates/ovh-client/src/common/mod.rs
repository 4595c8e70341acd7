//! Common utilities for the OVH API client
//!
//! Provides the signed HTTP transport shared by every API call.

pub mod signature;

use crate::config::Credentials;
use crate::error::OvhError;
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::debug;

/// Error body returned by the OVH API on non-2xx responses
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorBody {
    message: String,
    #[serde(default)]
    error_code: Option<String>,
}

/// HTTP client wrapper with OVH request signing
pub struct HttpClient {
    client: Client,
    base_url: String,
    application_key: String,
    application_secret: String,
    consumer_key: Option<String>,
    /// Server time minus local time, fetched once from `/auth/time`
    time_delta: OnceCell<i64>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("application_key", &self.application_key)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Create a new HTTP client wrapper
    pub fn new(client: Client, credentials: &Credentials) -> Result<Self, OvhError> {
        Ok(Self {
            client,
            base_url: credentials.base_url()?,
            application_key: credentials.application_key.clone(),
            application_secret: credentials.application_secret.clone(),
            consumer_key: credentials.consumer_key.clone(),
            time_delta: OnceCell::new(),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the application key
    pub fn application_key(&self) -> &str {
        &self.application_key
    }

    /// Build a full URL from a path
    pub fn build_url(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    /// Seconds to add to the local clock to match the API clock
    async fn time_delta(&self) -> Result<i64, OvhError> {
        self.time_delta
            .get_or_try_init(|| async {
                let server_time = self.server_time().await?;
                let delta = server_time - chrono::Utc::now().timestamp();
                debug!("OVH API clock delta: {}s", delta);
                Ok::<_, OvhError>(delta)
            })
            .await
            .copied()
    }

    /// Current API server time (unauthenticated `GET /auth/time`)
    pub async fn server_time(&self) -> Result<i64, OvhError> {
        let url = self.build_url("/auth/time");
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(OvhError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OvhError::Api(format!(
                "Failed to get API time: {} - {}",
                status,
                error_message(&body)
            )));
        }

        response.json().await.map_err(OvhError::Http)
    }

    /// Make a signed GET request
    pub async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, OvhError> {
        self.call(Method::GET, path, None, true).await
    }

    /// Make a signed PUT request
    pub async fn put<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, OvhError> {
        self.call(Method::PUT, path, Some(body), true).await
    }

    /// Make a signed POST request
    pub async fn post<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T, OvhError> {
        self.call(Method::POST, path, body, true).await
    }

    /// Make an unsigned POST request (only the application key is sent)
    pub async fn post_unauthenticated<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, OvhError> {
        self.call(Method::POST, path, Some(body), false).await
    }

    /// Send one request and decode the JSON response
    ///
    /// The body is serialized once so the signature covers the exact bytes sent.
    pub async fn call<T: for<'de> Deserialize<'de>>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        need_auth: bool,
    ) -> Result<T, OvhError> {
        let url = self.build_url(path);
        let body_text = match body {
            Some(value) => serde_json::to_string(value)?,
            None => String::new(),
        };
        debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("X-Ovh-Application", &self.application_key)
            .header("Accept", "application/json");

        if body.is_some() {
            request = request
                .header("Content-Type", "application/json")
                .body(body_text.clone());
        }

        if need_auth {
            let consumer_key = self.consumer_key.as_deref().ok_or_else(|| {
                OvhError::Configuration("consumer_key is required for this call".to_string())
            })?;
            let timestamp = chrono::Utc::now().timestamp() + self.time_delta().await?;
            let signature = signature::sign_request(
                &self.application_secret,
                consumer_key,
                method.as_str(),
                &url,
                &body_text,
                timestamp,
            );
            request = request
                .header("X-Ovh-Consumer", consumer_key)
                .header("X-Ovh-Timestamp", timestamp.to_string())
                .header("X-Ovh-Signature", signature);
        }

        let response = request.send().await.map_err(OvhError::Http)?;
        let status = response.status();
        let text = response.text().await.map_err(OvhError::Http)?;

        if !status.is_success() {
            return Err(status_error(&method, path, status, &error_message(&text)));
        }

        // PUT and some POST calls answer with an empty body or `null`
        let payload = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(payload).map_err(|e| {
            OvhError::Api(format!(
                "error decoding response body: {} - Response (first 500 chars): {}",
                e,
                text.chars().take(500).collect::<String>()
            ))
        })
    }
}

/// Map a non-success status to the matching error kind
fn status_error(method: &Method, path: &str, status: StatusCode, message: &str) -> OvhError {
    match status.as_u16() {
        401 | 403 => OvhError::Authentication(format!("{} {}: {} - {}", method, path, status, message)),
        404 => OvhError::NotFound(format!("{} - {}", path, message)),
        400 => OvhError::InvalidRequest(format!("{} {}: {}", method, path, message)),
        _ => OvhError::Api(format!("{} {} failed: {} - {}", method, path, status, message)),
    }
}

/// Extract the human-readable message from an OVH error body
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => match parsed.error_code {
            Some(code) => format!("{} ({})", parsed.message, code),
            None => parsed.message,
        },
        Err(_) => body.chars().take(500).collect(),
    }
}
