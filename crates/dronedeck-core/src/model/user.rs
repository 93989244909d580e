// ── User / RBAC domain model ──

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;

/// A dashboard user together with the role list RBAC screens render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Request body for a single role assignment or revocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleChange {
    pub role: String,
}

impl RoleChange {
    pub fn new(role: impl Into<String>) -> Self {
        Self { role: role.into() }
    }
}
