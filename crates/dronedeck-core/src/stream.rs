// ── Reactive entry streams ──
//
// Subscription handles vended by the CacheStore. Views hold one of
// these per rendered key and re-render on `changed()`.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::CacheEntry;

/// A subscription to a single cache key.
///
/// Provides both point-in-time snapshot access and reactive change
/// notification via `changed()` or by converting to a `Stream`. The
/// item is `None` while the key is absent from the store.
pub struct EntryStream<T: Clone + Send + Sync + 'static> {
    current: Option<Arc<CacheEntry<T>>>,
    receiver: watch::Receiver<Option<Arc<CacheEntry<T>>>>,
}

impl<T: Clone + Send + Sync + 'static> EntryStream<T> {
    pub(crate) fn new(receiver: watch::Receiver<Option<Arc<CacheEntry<T>>>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// Get the entry captured at subscription time.
    pub fn current(&self) -> &Option<Arc<CacheEntry<T>>> {
        &self.current
    }

    /// Get the latest entry (may have changed since subscription).
    pub fn latest(&self) -> Option<Arc<CacheEntry<T>>> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new entry.
    /// Returns `None` if the sender (CacheStore) has been dropped.
    pub async fn changed(&mut self) -> Option<Option<Arc<CacheEntry<T>>>> {
        self.receiver.changed().await.ok()?;
        let entry = self.receiver.borrow_and_update().clone();
        self.current = entry.clone();
        Some(entry)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> EntryWatchStream<T> {
        EntryWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields the key's new entry each time it is written, invalidated,
/// or removed.
pub struct EntryWatchStream<T: Clone + Send + Sync + 'static> {
    inner: WatchStream<Option<Arc<CacheEntry<T>>>>,
}

impl<T: Clone + Send + Sync + 'static> Stream for EntryWatchStream<T> {
    type Item = Option<Arc<CacheEntry<T>>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // WatchStream is Unpin when the inner type is Unpin, and
        // Option<Arc<_>> always is.
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::model::CacheKey;
    use crate::store::{CacheEntry, CacheStore};
    use futures_util::StreamExt;

    #[tokio::test]
    async fn changed_yields_new_entry() {
        let store: CacheStore<u32> = CacheStore::new();
        let key = CacheKey::drone("d-1");
        let mut stream = store.subscribe(&key);

        store.set(&key, CacheEntry::server(42));

        let entry = stream.changed().await.unwrap().unwrap();
        assert_eq!(entry.value, 42);
    }

    #[tokio::test]
    async fn into_stream_yields_on_write() {
        let store: CacheStore<u32> = CacheStore::new();
        let key = CacheKey::drone("d-1");
        let mut stream = store.subscribe(&key).into_stream();

        // First item is the initial (absent) state.
        assert!(stream.next().await.unwrap().is_none());

        store.set(&key, CacheEntry::server(7));
        let entry = stream.next().await.unwrap().unwrap();
        assert_eq!(entry.value, 7);
    }
}
