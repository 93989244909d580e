// ── Batch coordinator ──
//
// Fans a batch out as independent coordinator invocations and collects
// every outcome. There is deliberately no all-or-nothing semantics:
// each item settles or rolls back on its own, so one rejected role
// assignment never cancels or reverts its siblings.

use futures_util::future::join_all;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::catalog::OperationKind;
use crate::coordinator::Coordinator;
use crate::error::CoreError;
use crate::model::CacheKey;

/// One mutation in a batch.
#[derive(Debug, Clone)]
pub struct BatchItem<R> {
    pub key: CacheKey,
    pub kind: OperationKind,
    pub request: R,
}

impl<R> BatchItem<R> {
    pub fn new(key: CacheKey, kind: impl Into<OperationKind>, request: R) -> Self {
        Self {
            key,
            kind: kind.into(),
            request,
        }
    }
}

/// Terminal result of one batch item.
#[derive(Debug)]
pub enum Outcome<T> {
    /// Reconciled with the server's authoritative value.
    Settled(T),
    /// Failed and rolled back to the pre-mutation cache state.
    RolledBack(CoreError),
}

impl<T> Outcome<T> {
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Settled(_))
    }

    pub fn error(&self) -> Option<&CoreError> {
        match self {
            Self::RolledBack(err) => Some(err),
            Self::Settled(_) => None,
        }
    }
}

/// Dispatches batches of independent mutations.
pub struct BatchCoordinator<'a, T, R>
where
    T: Clone + Send + Sync + DeserializeOwned + 'static,
    R: Serialize + Send + Sync,
{
    coordinator: &'a Coordinator<T, R>,
}

impl<'a, T, R> BatchCoordinator<'a, T, R>
where
    T: Clone + Send + Sync + DeserializeOwned + 'static,
    R: Serialize + Send + Sync,
{
    pub fn new(coordinator: &'a Coordinator<T, R>) -> Self {
        Self { coordinator }
    }

    /// Run every item to its terminal state, concurrently.
    ///
    /// Outcomes are returned in item order regardless of completion
    /// order. Items targeting the same key serialize against each other
    /// like any other concurrent mutations: the later one is rejected
    /// with `AlreadyPending` rather than interleaving.
    pub async fn run_all(&self, items: Vec<BatchItem<R>>) -> Vec<Outcome<T>> {
        let total = items.len();
        let outcomes = join_all(items.iter().map(|item| async {
            match self
                .coordinator
                .run(&item.key, &item.kind, &item.request)
                .await
            {
                Ok(value) => Outcome::Settled(value),
                Err(err) => Outcome::RolledBack(err),
            }
        }))
        .await;

        let settled = outcomes.iter().filter(|o| o.is_settled()).count();
        info!(total, settled, rolled_back = total - settled, "batch complete");
        outcomes
    }
}
