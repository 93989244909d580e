//! Client-side state management for the dronedeck fleet dashboard.
//!
//! The crate's centerpiece is the **optimistic mutation coordinator**:
//! when a user issues a command, the predicted result is written to the
//! cache immediately, the real operation runs against the fleet service
//! in the background, and the cache is then reconciled with the
//! authoritative response — or rolled back byte-for-byte on failure.
//! Every view keeps reading one consistent store throughout.
//!
//! - **[`CacheStore`]** — keyed table of entity snapshots with per-key
//!   `watch`-channel subscriptions ([`EntryStream`]); the single source
//!   of truth read by every view.
//! - **[`SnapshotManager`]** — captures the exact pre-mutation entry
//!   and restores it on rollback.
//! - **[`InFlightTracker`]** — records unsettled mutations, one per
//!   key; its atomic `begin` serializes same-key mutations.
//! - **[`CommandCatalog`]** — per operation kind: endpoint, retry
//!   class, dependent invalidations, and the pure [`Projector`] that
//!   predicts post-mutation state.
//! - **[`MutationExecutor`]** — remote call via the injected
//!   [`Transport`](dronedeck_api::Transport), bounded idempotent retry,
//!   error normalization into [`CoreError`].
//! - **[`Coordinator`]** — the per-mutation state machine
//!   (`Idle → Pending → {Settled, RolledBack}`).
//! - **[`BatchCoordinator`]** — independent fan-out with per-item
//!   outcomes; one failure never rolls back its siblings.

pub mod batch;
pub mod catalog;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod executor;
pub mod model;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use batch::{BatchCoordinator, BatchItem, Outcome};
pub use catalog::drone::drone_catalog;
pub use catalog::rbac::rbac_catalog;
pub use catalog::{CommandCatalog, CommandSpec, OperationKind, PathTemplate, Projector, Reconcile};
pub use config::CoordinatorConfig;
pub use coordinator::Coordinator;
pub use error::CoreError;
pub use executor::MutationExecutor;
pub use store::{
    CacheEntry, CacheStore, InFlightTracker, Origin, PendingOperation, Snapshot, SnapshotManager,
};
pub use stream::{EntryStream, EntryWatchStream};

// Re-export model types at the crate root for ergonomics.
pub use model::{CacheKey, Collection, Drone, DroneCommand, EntityId, FlightStatus, RoleChange, User};
