// ── Reactive store layer ──
//
// The cache table, the snapshot mechanism that undoes failed optimistic
// writes, and the tracker that serializes mutations per key.

pub mod cache;
pub mod inflight;
pub mod snapshot;

pub use cache::{CacheEntry, CacheStore, Origin};
pub use inflight::{InFlightTracker, PendingOperation};
pub use snapshot::{Snapshot, SnapshotManager};
