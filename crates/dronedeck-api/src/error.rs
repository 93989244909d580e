use thiserror::Error;

/// Top-level error type for the `dronedeck-api` crate.
///
/// Covers every failure mode of the transport surface. `dronedeck-core`
/// maps these into its closed coordination-layer taxonomy and never
/// exposes raw transport errors to callers.
#[derive(Debug, Error)]
pub enum ApiError {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Client construction failed (bad header value, builder error).
    #[error("Transport configuration error: {0}")]
    Config(String),

    // ── Remote service ──────────────────────────────────────────────
    /// Non-2xx response from the fleet service, with the extracted
    /// error message from the response envelope when one was present.
    #[error("API error (HTTP {status}): {message}")]
    Api { message: String, status: u16 },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl ApiError {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Api { status, .. } => (500..=599).contains(status),
            _ => false,
        }
    }

    /// Returns `true` if this error surfaced as a timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Extract the HTTP status code, if the failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_transient() {
        let err = ApiError::Api {
            message: "boom".into(),
            status: 503,
        };
        assert!(err.is_transient());
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn client_errors_are_not_transient() {
        let err = ApiError::Api {
            message: "bad request".into(),
            status: 400,
        };
        assert!(!err.is_transient());
        assert!(!err.is_timeout());
    }

    #[test]
    fn timeout_is_transient() {
        let err = ApiError::Timeout { timeout_secs: 30 };
        assert!(err.is_transient());
        assert!(err.is_timeout());
        assert_eq!(err.status(), None);
    }
}
