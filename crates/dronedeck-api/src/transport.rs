// Transport seam between the coordination core and the fleet service.
//
// The core only ever talks to `dyn Transport`; the production
// implementation wraps a shared `reqwest::Client` configured here so
// TLS, timeout, and auth-header logic is not duplicated per caller.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::ApiError;

// ── Method ──────────────────────────────────────────────────────────

/// HTTP method for a transport call.
///
/// A local enum rather than `reqwest::Method` so `dronedeck-core` can
/// describe endpoints without depending on the HTTP client crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(m: Method) -> Self {
        match m {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

// ── Transport trait ─────────────────────────────────────────────────

/// The remote-call seam consumed by the coordination core.
///
/// Implementations must run every dispatched call to completion — the
/// core provides no mid-flight cancellation and relies on exactly one
/// success-or-failure result per call. Timeouts are the transport's
/// responsibility and surface as ordinary errors.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one request against the fleet service.
    ///
    /// Returns the decoded JSON response body (`Value::Null` for empty
    /// bodies) or a normalized [`ApiError`].
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError>;
}

// ── TransportConfig ─────────────────────────────────────────────────

/// TLS verification mode.
#[derive(Debug, Clone)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (for self-hosted fleet services).
    DangerAcceptInvalid,
}

/// Shared configuration for building the HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    /// API key injected as the `X-API-KEY` default header.
    pub api_key: Option<SecretString>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
            api_key: None,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, ApiError> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent("dronedeck/0.1.0");

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| ApiError::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| ApiError::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        if let Some(ref key) = self.api_key {
            let mut headers = reqwest::header::HeaderMap::new();
            let mut value = reqwest::header::HeaderValue::from_str(key.expose_secret())
                .map_err(|e| ApiError::Config(format!("invalid API key header: {e}")))?;
            value.set_sensitive(true);
            headers.insert("X-API-KEY", value);
            builder = builder.default_headers(headers);
        }

        builder
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))
    }
}

// ── HttpTransport ───────────────────────────────────────────────────

/// Production [`Transport`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a transport rooted at `base_url` using the given config.
    pub fn new(base_url: &str, config: &TransportConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)?;
        let client = config.build_client()?;
        Ok(Self { client, base_url })
    }

    /// Wrap an existing `reqwest::Client` (used by tests).
    pub fn from_reqwest(base_url: &str, client: reqwest::Client) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let url = self.base_url.join(path)?;
        debug!(%method, %url, "transport request");

        let mut request = self.client.request(method.into(), url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            if bytes.is_empty() {
                return Ok(Value::Null);
            }
            serde_json::from_slice(&bytes).map_err(|e| ApiError::Deserialization {
                message: e.to_string(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            })
        } else {
            // Fleet service errors carry `{"message": "..."}`; fall back
            // to the canonical reason phrase for bare responses.
            let message = serde_json::from_slice::<Value>(&bytes)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_owned()
                });
            debug!(%status, %message, "transport request failed");
            Err(ApiError::Api {
                message,
                status: status.as_u16(),
            })
        }
    }
}
