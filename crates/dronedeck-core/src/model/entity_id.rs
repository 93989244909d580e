// ── Core identity types ──
//
// EntityId, Collection, and CacheKey form the foundation of every cache
// operation. A CacheKey identifies exactly one entity's cached view and
// is the unit of serialization for optimistic mutations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ── EntityId ────────────────────────────────────────────────────────

/// Canonical identifier for any fleet entity.
///
/// Transparently wraps either a UUID or a service-assigned name/number
/// string. Consumers never care which.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Uuid(Uuid),
    Named(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid(u) => write!(f, "{u}"),
            Self::Named(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_owned()))
    }
}

impl From<Uuid> for EntityId {
    fn from(u: Uuid) -> Self {
        Self::Uuid(u)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        match Uuid::parse_str(&s) {
            Ok(u) => Self::Uuid(u),
            Err(_) => Self::Named(s),
        }
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<u64> for EntityId {
    fn from(n: u64) -> Self {
        Self::Named(n.to_string())
    }
}

// ── Collection ──────────────────────────────────────────────────────

/// The cache table an entity lives in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Drones,
    Users,
    Roles,
    Stats,
    /// Escape hatch for dashboards this crate doesn't know about.
    Other(String),
}

impl Collection {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Drones => "drones",
            Self::Users => "users",
            Self::Roles => "roles",
            Self::Stats => "stats",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── CacheKey ────────────────────────────────────────────────────────

/// Composite `(collection, id)` identifying one entity's cached view.
///
/// Immutable and value-comparable; used as the table key everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub collection: Collection,
    pub id: EntityId,
}

impl CacheKey {
    pub fn new(collection: Collection, id: impl Into<EntityId>) -> Self {
        Self {
            collection,
            id: id.into(),
        }
    }

    /// Shorthand for a drone's cache key.
    pub fn drone(id: impl Into<EntityId>) -> Self {
        Self::new(Collection::Drones, id)
    }

    /// Shorthand for a user's cache key.
    pub fn user(id: impl Into<EntityId>) -> Self {
        Self::new(Collection::Users, id)
    }

    /// The fleet-wide aggregate statistics key, invalidated by most
    /// drone commands.
    pub fn fleet_stats() -> Self {
        Self::new(Collection::Stats, "fleet")
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_from_uuid_string() {
        let id = EntityId::from("550e8400-e29b-41d4-a716-446655440000");
        assert!(matches!(id, EntityId::Uuid(_)));
    }

    #[test]
    fn entity_id_from_plain_string() {
        let id = EntityId::from("drone-7");
        assert_eq!(id, EntityId::Named("drone-7".into()));
    }

    #[test]
    fn entity_id_from_number() {
        let id = EntityId::from(7u64);
        assert_eq!(id.to_string(), "7");
    }

    #[test]
    fn cache_key_display_and_equality() {
        let a = CacheKey::drone("d-1");
        let b = CacheKey::new(Collection::Drones, "d-1");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "drones/d-1");
        assert_ne!(a, CacheKey::user("d-1"));
    }

    #[test]
    fn fleet_stats_key_is_stable() {
        assert_eq!(CacheKey::fleet_stats(), CacheKey::fleet_stats());
        assert_eq!(CacheKey::fleet_stats().to_string(), "stats/fleet");
    }
}
