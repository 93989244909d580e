// ── RBAC command catalog ──

use std::sync::Arc;

use dronedeck_api::Method;

use super::{CommandCatalog, CommandSpec};
use crate::model::{RoleChange, User};

/// Catalog for role assignment and revocation on user role lists.
///
/// Both operations are idempotent: granting a role twice or revoking a
/// missing one converges to the same server state, so transient
/// failures are safe to retry.
pub fn rbac_catalog() -> CommandCatalog<User, RoleChange> {
    CommandCatalog::new()
        .with(
            "assign_role",
            CommandSpec::new(Method::Post, "fleet/users/{id}/roles")
                .idempotent()
                .project(Arc::new(|user: &User, change: &RoleChange| {
                    let mut predicted = user.clone();
                    if !predicted.roles.contains(&change.role) {
                        predicted.roles.push(change.role.clone());
                    }
                    predicted
                })),
        )
        .with(
            "revoke_role",
            CommandSpec::new(Method::Delete, "fleet/users/{id}/roles")
                .idempotent()
                .project(Arc::new(|user: &User, change: &RoleChange| {
                    let mut predicted = user.clone();
                    predicted.roles.retain(|r| r != &change.role);
                    predicted
                })),
        )
}
