// ── Core error types ──
//
// The closed failure taxonomy callers see. Every transport failure is
// normalized into one of these variants — dashboards never handle raw
// HTTP errors or ad-hoc exception shapes.

use thiserror::Error;

use crate::catalog::OperationKind;
use crate::model::CacheKey;

/// Unified error type for the coordination core.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Remote rejection ─────────────────────────────────────────────
    /// Request rejected by the fleet service (4xx-equivalent). Never
    /// retried: resending an invalid request cannot succeed.
    #[error("Validation failed: {message}")]
    Validation { message: String, status: Option<u16> },

    /// Server-side failure (5xx-equivalent). Retried for idempotent
    /// operation kinds.
    #[error("Server error: {message}")]
    Server { message: String, status: Option<u16> },

    // ── Transport ────────────────────────────────────────────────────
    /// Network or connection failure before a response was produced.
    #[error("Transport failure: {message}")]
    Transport { message: String },

    /// The transport's deadline elapsed. Treated as a server error for
    /// retry purposes.
    #[error("Request timed out")]
    Timeout,

    // ── Local preconditions ──────────────────────────────────────────
    /// A mutation is already in flight for this key; the caller should
    /// queue or surface "operation in progress". Never reaches the
    /// network.
    #[error("Operation already pending for {key} ({kind})")]
    AlreadyPending { key: CacheKey, kind: OperationKind },

    /// The operation kind has no entry in the command catalog.
    #[error("Unknown operation kind: {kind}")]
    UnknownOperation { kind: OperationKind },

    // ── Data ─────────────────────────────────────────────────────────
    /// The server's response could not be decoded into the entity type.
    #[error("Response deserialization failed: {message}")]
    Deserialization { message: String },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` if retrying could plausibly succeed. The executor
    /// additionally requires the operation kind to be idempotent.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Server { .. } | Self::Transport { .. } | Self::Timeout
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<dronedeck_api::ApiError> for CoreError {
    fn from(err: dronedeck_api::ApiError) -> Self {
        use dronedeck_api::ApiError;

        match err {
            ApiError::Api { message, status } => {
                if (400..=499).contains(&status) {
                    CoreError::Validation {
                        message,
                        status: Some(status),
                    }
                } else {
                    CoreError::Server {
                        message,
                        status: Some(status),
                    }
                }
            }
            ApiError::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else {
                    CoreError::Transport {
                        message: err.to_string(),
                    }
                }
            }
            ApiError::Timeout { .. } => CoreError::Timeout,
            ApiError::InvalidUrl(_) | ApiError::Tls(_) | ApiError::Config(_) => {
                CoreError::Transport {
                    message: err.to_string(),
                }
            }
            ApiError::Deserialization { message, .. } => CoreError::Deserialization { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dronedeck_api::ApiError;

    #[test]
    fn status_classes_map_to_taxonomy() {
        let validation = CoreError::from(ApiError::Api {
            message: "bad".into(),
            status: 422,
        });
        assert!(matches!(validation, CoreError::Validation { .. }));
        assert!(!validation.is_retryable());

        let server = CoreError::from(ApiError::Api {
            message: "boom".into(),
            status: 502,
        });
        assert!(matches!(server, CoreError::Server { .. }));
        assert!(server.is_retryable());
    }

    #[test]
    fn timeout_is_retryable() {
        let err = CoreError::from(ApiError::Timeout { timeout_secs: 30 });
        assert!(matches!(err, CoreError::Timeout));
        assert!(err.is_retryable());
    }

    #[test]
    fn already_pending_is_never_retryable() {
        let err = CoreError::AlreadyPending {
            key: CacheKey::drone("d-1"),
            kind: "takeoff".into(),
        };
        assert!(!err.is_retryable());
    }
}
