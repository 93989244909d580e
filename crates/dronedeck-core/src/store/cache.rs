// ── Keyed reactive cache ──
//
// Lock-free concurrent storage with O(1) lookups and push-based
// change notification via per-key `watch` channels. The store is the
// single source of truth read by every view; all mutation goes through
// `set` / `remove` / `invalidate`, never through field access.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::sync::watch;

use crate::model::CacheKey;
use crate::store::inflight::InFlightTracker;
use crate::stream::EntryStream;

// ── CacheEntry ──────────────────────────────────────────────────────

/// Provenance of a cached value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Confirmed by the fleet service.
    Server,
    /// Locally predicted, unconfirmed.
    Optimistic,
}

/// One entity's cached view.
///
/// Mutated only through [`CacheStore`]'s write API; readers always
/// observe a complete, internally consistent entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub value: T,
    pub origin: Origin,
    pub written_at: DateTime<Utc>,
    /// Set by `invalidate`; the next reader should refetch.
    pub stale: bool,
}

impl<T> CacheEntry<T> {
    /// An entry confirmed by the server.
    pub fn server(value: T) -> Self {
        Self {
            value,
            origin: Origin::Server,
            written_at: Utc::now(),
            stale: false,
        }
    }

    /// A locally predicted entry awaiting confirmation.
    pub fn optimistic(value: T) -> Self {
        Self {
            value,
            origin: Origin::Optimistic,
            written_at: Utc::now(),
            stale: false,
        }
    }

    pub fn is_optimistic(&self) -> bool {
        self.origin == Origin::Optimistic
    }
}

// ── CacheStore ──────────────────────────────────────────────────────

/// Keyed table of entity snapshots with per-key change notification.
///
/// Reads are wait-free; writes use fine-grained per-shard locks within
/// `DashMap`. Every write notifies the key's subscribers synchronously
/// before returning, so a view reading the store after `set` returns
/// always observes the new value.
pub struct CacheStore<T: Clone + Send + Sync + 'static> {
    entries: DashMap<CacheKey, Arc<CacheEntry<T>>>,
    watchers: DashMap<CacheKey, watch::Sender<Option<Arc<CacheEntry<T>>>>>,
}

impl<T: Clone + Send + Sync + 'static> CacheStore<T> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            watchers: DashMap::new(),
        }
    }

    /// Look up the current entry for a key (cheap `Arc` clone).
    pub fn get(&self, key: &CacheKey) -> Option<Arc<CacheEntry<T>>> {
        self.entries.get(key).map(|r| Arc::clone(r.value()))
    }

    /// Insert or replace the entry for a key and notify subscribers.
    pub fn set(&self, key: &CacheKey, entry: CacheEntry<T>) {
        self.entries.insert(key.clone(), Arc::new(entry));
        self.notify(key);
    }

    /// Remove the entry for a key. Returns the removed entry if it existed.
    pub fn remove(&self, key: &CacheKey) -> Option<Arc<CacheEntry<T>>> {
        let removed = self.entries.remove(key).map(|(_, v)| v);
        if removed.is_some() {
            self.notify(key);
        }
        removed
    }

    /// Mark the entry stale, signalling the next reader to refetch
    /// through the data-fetch layer. No-op for absent keys.
    pub fn invalidate(&self, key: &CacheKey) {
        if let Some(mut entry_ref) = self.entries.get_mut(key) {
            let mut entry = (**entry_ref).clone();
            entry.stale = true;
            *entry_ref = Arc::new(entry);
            drop(entry_ref);
            self.notify(key);
        }
    }

    /// Subscribe to changes for a single key.
    ///
    /// The stream's initial value is the key's current entry (or `None`
    /// if absent), so late subscribers never miss the present state.
    pub fn subscribe(&self, key: &CacheKey) -> EntryStream<T> {
        let receiver = match self.watchers.entry(key.clone()) {
            Entry::Occupied(occupied) => occupied.get().subscribe(),
            Entry::Vacant(vacant) => {
                let current = self.entries.get(key).map(|r| Arc::clone(r.value()));
                let (tx, rx) = watch::channel(current);
                vacant.insert(tx);
                rx
            }
        };
        EntryStream::new(receiver)
    }

    /// Bulk server refresh: write confirmed entries for every key that
    /// does not have an unsettled mutation. Skipping pending keys keeps
    /// a background refresh from clobbering an optimistic write.
    pub fn apply_refresh(&self, entries: Vec<(CacheKey, T)>, tracker: &InFlightTracker<T>) {
        let mut applied = 0usize;
        let mut skipped = 0usize;
        for (key, value) in entries {
            if tracker.is_pending(&key) {
                skipped += 1;
                continue;
            }
            self.set(&key, CacheEntry::server(value));
            applied += 1;
        }
        tracing::debug!(applied, skipped, "refresh applied");
    }

    /// Return all current keys in the store.
    pub fn keys(&self) -> Vec<CacheKey> {
        self.entries.iter().map(|r| r.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Push the key's current entry to its subscribers. A channel whose
    /// receivers have all been dropped is pruned instead, so the
    /// watcher table does not grow with long-gone subscriptions.
    /// `send_modify` updates unconditionally, even with zero receivers.
    fn notify(&self, key: &CacheKey) {
        let mut dead = false;
        if let Some(tx) = self.watchers.get(key) {
            if tx.receiver_count() == 0 {
                dead = true;
            } else {
                let current = self.entries.get(key).map(|r| Arc::clone(r.value()));
                tx.send_modify(|v| *v = current);
            }
        }
        if dead {
            // Re-checked under the entry lock: a subscriber that raced
            // in since the check above keeps the channel alive.
            self.watchers
                .remove_if(key, |_, tx| tx.receiver_count() == 0);
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Default for CacheStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
