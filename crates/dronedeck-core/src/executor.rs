// ── Mutation executor ──
//
// Performs the remote call for one mutation: renders the endpoint,
// serializes the request, delegates to the Transport, decodes the
// response, and normalizes every failure into CoreError. Transient
// failures of idempotent kinds are retried a bounded number of times
// with exponential backoff.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use dronedeck_api::Transport;

use crate::catalog::{CommandSpec, OperationKind};
use crate::config::CoordinatorConfig;
use crate::error::CoreError;
use crate::model::CacheKey;

/// Executes mutations through the injected [`Transport`].
pub struct MutationExecutor {
    transport: Arc<dyn Transport>,
    config: CoordinatorConfig,
}

impl MutationExecutor {
    pub fn new(transport: Arc<dyn Transport>, config: CoordinatorConfig) -> Self {
        Self { transport, config }
    }

    /// Run one remote operation to completion.
    ///
    /// Once dispatched there is no cancellation: the call always
    /// resolves to exactly one success or one typed failure.
    pub async fn execute<T, R>(
        &self,
        kind: &OperationKind,
        spec: &CommandSpec<T, R>,
        key: &CacheKey,
        request: &R,
    ) -> Result<T, CoreError>
    where
        T: DeserializeOwned,
        R: Serialize + Sync,
    {
        let path = spec.endpoint.render(key);
        let body = serde_json::to_value(request)
            .map_err(|e| CoreError::Internal(format!("request serialization failed: {e}")))?;

        let mut attempt = 0u32;
        loop {
            let result = self
                .transport
                .send(spec.method, &path, Some(body.clone()))
                .await;

            match result {
                Ok(value) => return decode(value),
                Err(api_err) => {
                    let err = CoreError::from(api_err);
                    let retryable =
                        spec.idempotent && err.is_retryable() && attempt < self.config.max_retries;
                    if !retryable {
                        return Err(err);
                    }

                    let delay = self.config.backoff_for(attempt);
                    warn!(
                        %kind,
                        %key,
                        %err,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, CoreError> {
    serde_json::from_value(value).map_err(|e| CoreError::Deserialization {
        message: e.to_string(),
    })
}
