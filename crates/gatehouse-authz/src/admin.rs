//! Policy administration operations.
//!
//! Every call is itself authorized by the engine it administers, using the
//! operations registered by [`OperationRegistry::with_admin_operations`]
//! (`users.read` to look, `users.update` to change).
//!
//! [`OperationRegistry::with_admin_operations`]: crate::OperationRegistry::with_admin_operations
use crate::engine::AuthorizationEngine;
use crate::errors::{AdminError, AdminResult};
use crate::grants::{Grants, RawGrants};
use crate::registry::{OP_GET_ROLE, OP_LIST_MODULES, OP_LIST_ROLES, OP_UPDATE_ROLE};
use crate::role::Role;
use crate::taxonomy::{CapabilityModule, list_modules};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct PolicyAdmin {
    engine: Arc<AuthorizationEngine>,
}

impl PolicyAdmin {
    pub fn new(engine: Arc<AuthorizationEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Arc<AuthorizationEngine> {
        &self.engine
    }

    pub fn list_modules(&self, actor: &str) -> AdminResult<&'static [CapabilityModule]> {
        self.require(actor, OP_LIST_MODULES)?;
        Ok(list_modules())
    }

    /// Grants for `role`; unknown roles yield an empty map.
    pub fn get_role_permissions(&self, actor: &str, role: &str) -> AdminResult<Grants> {
        self.require(actor, OP_GET_ROLE)?;
        Ok(Grants::clone(&self.engine.get(role)))
    }

    pub fn list_all_role_permissions(&self, actor: &str) -> AdminResult<BTreeMap<Role, Grants>> {
        self.require(actor, OP_LIST_ROLES)?;
        Ok(self.engine.list_all())
    }

    /// Replace `role`'s grants; returns the cleaned grants actually stored.
    pub async fn update_role_permissions(
        &self,
        actor: &str,
        role: &Role,
        raw: &RawGrants,
    ) -> AdminResult<Grants> {
        self.require(actor, OP_UPDATE_ROLE)?;
        tracing::info!(actor, %role, "updating role permissions");
        Ok(self.engine.upsert(role, raw).await?)
    }

    fn require(&self, actor: &str, operation: &str) -> AdminResult<()> {
        if self.engine.authorize_operation(actor, operation) {
            Ok(())
        } else {
            Err(AdminError::Forbidden {
                role: actor.to_string(),
                operation: operation.to_string(),
            })
        }
    }
}
