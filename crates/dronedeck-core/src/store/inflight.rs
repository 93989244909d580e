// ── In-flight mutation tracker ──
//
// One PendingOperation per key. `begin` is the serialization point for
// the whole coordinator: the DashMap entry API makes reserve-if-vacant
// atomic, and the snapshot is captured inside the reservation, so two
// overlapping mutations on the same key can never both proceed and a
// snapshot can never record a competing mutation's unconfirmed write —
// the loser fails fast with AlreadyPending without capturing anything.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::catalog::OperationKind;
use crate::error::CoreError;
use crate::model::CacheKey;
use crate::store::snapshot::Snapshot;

/// An unsettled mutation on one cache key.
#[derive(Debug)]
pub struct PendingOperation<T> {
    pub key: CacheKey,
    pub kind: OperationKind,
    pub started_at: DateTime<Utc>,
    /// The pre-mutation entry, restored on rollback.
    pub snapshot: Snapshot<T>,
    /// Set once a projector's value lands in the cache — rollback is a
    /// no-op otherwise.
    pub wrote_optimistic: bool,
}

impl<T> PendingOperation<T> {
    pub fn new(
        key: CacheKey,
        kind: OperationKind,
        snapshot: Snapshot<T>,
        wrote_optimistic: bool,
    ) -> Self {
        Self {
            key,
            kind,
            started_at: Utc::now(),
            snapshot,
            wrote_optimistic,
        }
    }
}

/// Records which keys currently have an unsettled mutation.
///
/// Exposed to UIs for per-row spinners and control disabling.
pub struct InFlightTracker<T> {
    pending: DashMap<CacheKey, PendingOperation<T>>,
}

impl<T> InFlightTracker<T> {
    pub fn new() -> Self {
        Self {
            pending: DashMap::new(),
        }
    }

    /// Reserve the key for one mutation and capture its snapshot.
    ///
    /// `capture` runs only after the reservation succeeds, while the
    /// key is held, so the snapshot always records a state with no
    /// mutation in flight. Returns the captured entry's value (for
    /// projection), `None` if the key was absent.
    ///
    /// Fails with [`CoreError::AlreadyPending`] if an operation is
    /// already in flight for the key; `capture` is not invoked and the
    /// existing snapshot is left untouched in that case.
    pub fn begin<F>(
        &self,
        key: &CacheKey,
        kind: &OperationKind,
        capture: F,
    ) -> Result<Option<T>, CoreError>
    where
        T: Clone,
        F: FnOnce() -> Snapshot<T>,
    {
        match self.pending.entry(key.clone()) {
            Entry::Occupied(occupied) => Err(CoreError::AlreadyPending {
                key: key.clone(),
                kind: occupied.get().kind.clone(),
            }),
            Entry::Vacant(vacant) => {
                let snapshot = capture();
                let current = snapshot.entry().map(|e| e.value.clone());
                vacant.insert(PendingOperation::new(
                    key.clone(),
                    kind.clone(),
                    snapshot,
                    false,
                ));
                Ok(current)
            }
        }
    }

    /// Record that the pending operation wrote a speculative value and
    /// must restore its snapshot on failure.
    pub fn mark_optimistic(&self, key: &CacheKey) {
        if let Some(mut op) = self.pending.get_mut(key) {
            op.wrote_optimistic = true;
        }
    }

    /// The snapshot to restore before settling a failed mutation, if a
    /// speculative value was written. Cloned rather than removed, so
    /// the key stays reserved until [`settle`](Self::settle) — a
    /// competing `begin` cannot capture the un-restored value.
    pub fn rollback_snapshot(&self, key: &CacheKey) -> Option<Snapshot<T>>
    where
        T: Clone,
    {
        self.pending
            .get(key)
            .and_then(|op| op.wrote_optimistic.then(|| op.snapshot.clone()))
    }

    /// Clear the key's pending mark, returning the operation (and with
    /// it the snapshot) to the settling coordinator.
    pub fn settle(&self, key: &CacheKey) -> Option<PendingOperation<T>> {
        self.pending.remove(key).map(|(_, op)| op)
    }

    /// `true` exactly between `begin` returning and `settle`.
    pub fn is_pending(&self, key: &CacheKey) -> bool {
        self.pending.contains_key(key)
    }

    /// All keys with an unsettled mutation, for batch UIs.
    pub fn pending_keys(&self) -> Vec<CacheKey> {
        self.pending.iter().map(|r| r.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Default for InFlightTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}
