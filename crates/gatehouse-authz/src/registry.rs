//! Operation id → declared requirements.
//!
//! Calling layers register each gated operation once at startup instead of
//! attaching metadata to handlers. Lookups for unregistered operations return
//! the unguarded requirement set.
use crate::capability::{OperationRequirements, Requirement};
use std::collections::HashMap;

pub const OP_LIST_MODULES: &str = "permissions.modules.list";
pub const OP_GET_ROLE: &str = "permissions.roles.get";
pub const OP_LIST_ROLES: &str = "permissions.roles.list";
pub const OP_UPDATE_ROLE: &str = "permissions.roles.update";

/// Capabilities that gate the permission administration operations.
pub const CAP_USERS_READ: &str = "users.read";
pub const CAP_USERS_UPDATE: &str = "users.update";

#[derive(Debug, Clone, Default)]
pub struct OperationRegistry {
    operations: HashMap<String, OperationRequirements>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry containing the permission administration operations.
    pub fn with_admin_operations() -> Self {
        Self::new()
            .register(
                OP_LIST_MODULES,
                OperationRequirements::class(Requirement::capability(CAP_USERS_READ)),
            )
            .register(
                OP_GET_ROLE,
                OperationRequirements::class(Requirement::capability(CAP_USERS_READ)),
            )
            .register(
                OP_LIST_ROLES,
                OperationRequirements::class(Requirement::capability(CAP_USERS_READ)),
            )
            .register(
                OP_UPDATE_ROLE,
                OperationRequirements::handler(Requirement::capability(CAP_USERS_UPDATE))
                    .with_class(Requirement::capability(CAP_USERS_READ)),
            )
    }

    /// Add or replace the requirements for `operation`.
    pub fn register(
        mut self,
        operation: impl Into<String>,
        requirements: OperationRequirements,
    ) -> Self {
        self.operations.insert(operation.into(), requirements);
        self
    }

    pub fn requirements(&self, operation: &str) -> OperationRequirements {
        self.operations
            .get(operation)
            .cloned()
            .unwrap_or_default()
    }

    pub fn contains(&self, operation: &str) -> bool {
        self.operations.contains_key(operation)
    }

    pub fn operations(&self) -> impl Iterator<Item = (&str, &OperationRequirements)> {
        self.operations.iter().map(|(k, v)| (k.as_str(), v))
    }
}
