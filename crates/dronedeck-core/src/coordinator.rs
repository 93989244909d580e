// ── Optimistic mutation coordinator ──
//
// Orchestrates one logical mutation end to end:
//
//   begin (reserve the key + capture the snapshot) → optimistic write
//     → execute remote call → reconcile OR roll back → settle
//
// Per-invocation state machine: Idle → Pending → {Settled, RolledBack}.
// Idle is implicit (no PendingOperation exists). Both terminal
// transitions are final; a new invocation on the same key can only
// begin once the prior one has settled, enforced by the tracker.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use dronedeck_api::Transport;

use crate::catalog::{CommandCatalog, OperationKind, Reconcile};
use crate::config::CoordinatorConfig;
use crate::error::CoreError;
use crate::executor::MutationExecutor;
use crate::model::CacheKey;
use crate::store::{CacheEntry, CacheStore, InFlightTracker, SnapshotManager};

/// Coordinates optimistic mutations over one entity type.
///
/// Generic over the cached entity `T` and the request payload `R`; the
/// injected [`CommandCatalog`] supplies per-kind endpoints, projectors,
/// and retry classes. All collaborators are explicit — multiple
/// independent coordinators (one per test, one per dashboard) never
/// share hidden state.
pub struct Coordinator<T, R>
where
    T: Clone + Send + Sync + DeserializeOwned + 'static,
    R: Serialize + Send + Sync,
{
    store: Arc<CacheStore<T>>,
    snapshots: SnapshotManager<T>,
    tracker: Arc<InFlightTracker<T>>,
    executor: MutationExecutor,
    catalog: Arc<CommandCatalog<T, R>>,
}

impl<T, R> Coordinator<T, R>
where
    T: Clone + Send + Sync + DeserializeOwned + 'static,
    R: Serialize + Send + Sync,
{
    pub fn new(
        store: Arc<CacheStore<T>>,
        transport: Arc<dyn Transport>,
        catalog: Arc<CommandCatalog<T, R>>,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            snapshots: SnapshotManager::new(Arc::clone(&store)),
            store,
            tracker: Arc::new(InFlightTracker::new()),
            executor: MutationExecutor::new(transport, config),
            catalog,
        }
    }

    /// The cache store this coordinator writes through.
    pub fn store(&self) -> &Arc<CacheStore<T>> {
        &self.store
    }

    /// The in-flight tracker, for spinners and control disabling.
    pub fn tracker(&self) -> &Arc<InFlightTracker<T>> {
        &self.tracker
    }

    /// Run one logical mutation against `key`.
    ///
    /// On success the cache holds the server's authoritative value (or
    /// is marked stale, per the command's reconcile mode) and the value
    /// is returned. On failure the cache is back to its exact
    /// pre-mutation state and the typed error is returned; a decode
    /// failure of an accepted mutation additionally marks the entry
    /// stale, since remote state did change. Either way the key's
    /// pending mark is cleared before this returns.
    pub async fn run(
        &self,
        key: &CacheKey,
        kind: &OperationKind,
        request: &R,
    ) -> Result<T, CoreError> {
        let spec = self
            .catalog
            .get(kind)
            .ok_or_else(|| CoreError::UnknownOperation { kind: kind.clone() })?;

        // The snapshot is captured inside begin, while the key is
        // reserved, so it can never record another mutation's
        // unconfirmed value.
        let current = self
            .tracker
            .begin(key, kind, || self.snapshots.capture(key))?;

        // No await between begin and the optimistic write: subscribers
        // observe the reservation and the speculative value as one
        // transition.
        let mut wrote_optimistic = false;
        if let (Some(project), Some(current)) = (spec.projector.as_ref(), current.as_ref()) {
            let predicted = project(current, request);
            self.store.set(key, CacheEntry::optimistic(predicted));
            self.tracker.mark_optimistic(key);
            wrote_optimistic = true;
        }
        debug!(%key, %kind, optimistic = wrote_optimistic, "mutation begun");

        match self.executor.execute(kind, spec, key, request).await {
            Ok(value) => {
                match spec.reconcile {
                    Reconcile::Replace => self.store.set(key, CacheEntry::server(value.clone())),
                    Reconcile::Invalidate => self.store.invalidate(key),
                }
                for dependent in &spec.dependent_keys {
                    self.store.invalidate(dependent);
                }
                self.tracker.settle(key);
                info!(%key, %kind, "mutation settled");
                Ok(value)
            }
            Err(err) => {
                // Restore while the key is still reserved, then release
                // it: a competing begin can never capture the
                // un-restored speculative value.
                if let Some(snapshot) = self.tracker.rollback_snapshot(key) {
                    self.snapshots.restore(snapshot);
                }
                if matches!(err, CoreError::Deserialization { .. }) {
                    // An undecodable response still means the server
                    // accepted the mutation; the restored value is
                    // confirmed but outdated, so flag it for refetch.
                    self.store.invalidate(key);
                }
                self.tracker.settle(key);
                warn!(%key, %kind, error = %err, "mutation rolled back");
                Err(err)
            }
        }
    }
}
