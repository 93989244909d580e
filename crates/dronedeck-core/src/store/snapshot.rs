// ── Snapshot capture and restore ──
//
// A Snapshot is the rollback unit of an optimistic mutation: an exact
// pre-mutation copy of one cache entry, owned exclusively by the
// coordinator invocation that captured it. Restore and settle consume
// the snapshot, so it cannot outlive the mutation or be shared.

use std::sync::Arc;

use crate::model::CacheKey;
use crate::store::cache::{CacheEntry, CacheStore, Origin};

/// An immutable copy of a cache entry taken at the moment a mutation
/// begins. `entry == None` records that the key was absent, so rolling
/// back a creation removes the key again.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    key: CacheKey,
    entry: Option<CacheEntry<T>>,
}

impl<T> Snapshot<T> {
    /// A snapshot recording that the key held no entry.
    pub fn absent(key: CacheKey) -> Self {
        Self { key, entry: None }
    }

    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    pub fn entry(&self) -> Option<&CacheEntry<T>> {
        self.entry.as_ref()
    }

    pub fn is_absent(&self) -> bool {
        self.entry.is_none()
    }
}

/// Captures and restores cache entries for rollback.
pub struct SnapshotManager<T: Clone + Send + Sync + 'static> {
    store: Arc<CacheStore<T>>,
}

impl<T: Clone + Send + Sync + 'static> SnapshotManager<T> {
    pub fn new(store: Arc<CacheStore<T>>) -> Self {
        Self { store }
    }

    /// Capture a structural copy of the key's current entry.
    ///
    /// The copy shares nothing with the live entry: later writes to the
    /// store cannot reach into it.
    pub fn capture(&self, key: &CacheKey) -> Snapshot<T> {
        let entry = self.store.get(key).map(|arc| (*arc).clone());
        Snapshot {
            key: key.clone(),
            entry,
        }
    }

    /// Write the snapshot's value back into the store, re-tagged as
    /// server-confirmed. Per-key mutation serialization guarantees the
    /// captured entry was itself confirmed (a pending optimistic entry
    /// would have rejected the capturing mutation's begin).
    pub fn restore(&self, snapshot: Snapshot<T>) {
        match snapshot.entry {
            Some(mut entry) => {
                entry.origin = Origin::Server;
                self.store.set(&snapshot.key, entry);
            }
            None => {
                self.store.remove(&snapshot.key);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn key() -> CacheKey {
        CacheKey::drone("d-1")
    }

    #[test]
    fn capture_is_a_deep_copy() {
        let store: Arc<CacheStore<Vec<String>>> = Arc::new(CacheStore::new());
        let manager = SnapshotManager::new(Arc::clone(&store));

        store.set(&key(), CacheEntry::server(vec!["grounded".into()]));
        let snapshot = manager.capture(&key());

        // Overwrite the live entry; the snapshot must not move.
        store.set(&key(), CacheEntry::optimistic(vec!["taking_off".into()]));
        assert_eq!(
            snapshot.entry().unwrap().value,
            vec!["grounded".to_owned()]
        );
    }

    #[test]
    fn restore_puts_back_exact_value_as_server() {
        let store: Arc<CacheStore<String>> = Arc::new(CacheStore::new());
        let manager = SnapshotManager::new(Arc::clone(&store));

        store.set(&key(), CacheEntry::server("grounded".into()));
        let snapshot = manager.capture(&key());

        store.set(&key(), CacheEntry::optimistic("emergency".into()));
        manager.restore(snapshot);

        let entry = store.get(&key()).unwrap();
        assert_eq!(entry.value, "grounded");
        assert_eq!(entry.origin, Origin::Server);
    }

    #[test]
    fn restore_of_absent_snapshot_removes_key() {
        let store: Arc<CacheStore<String>> = Arc::new(CacheStore::new());
        let manager = SnapshotManager::new(Arc::clone(&store));

        let snapshot = manager.capture(&key());
        assert!(snapshot.is_absent());

        store.set(&key(), CacheEntry::optimistic("speculative".into()));
        manager.restore(snapshot);
        assert!(store.get(&key()).is_none());
    }

    #[test]
    fn stale_flag_survives_capture_and_restore() {
        let store: Arc<CacheStore<String>> = Arc::new(CacheStore::new());
        let manager = SnapshotManager::new(Arc::clone(&store));

        store.set(&key(), CacheEntry::server("v1".into()));
        store.invalidate(&key());
        let snapshot = manager.capture(&key());

        store.set(&key(), CacheEntry::optimistic("v2".into()));
        manager.restore(snapshot);
        assert!(store.get(&key()).unwrap().stale);
    }
}
