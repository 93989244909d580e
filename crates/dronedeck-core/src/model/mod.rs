// ── Domain model ──
//
// Identity types plus the concrete entities the fleet dashboard caches.
// The coordination core itself is generic; these types back the shipped
// drone and RBAC catalogs.

pub mod drone;
pub mod entity_id;
pub mod user;

pub use drone::{Drone, DroneCommand, FlightStatus};
pub use entity_id::{CacheKey, Collection, EntityId};
pub use user::{RoleChange, User};
