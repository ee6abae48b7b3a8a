//! Request and response payloads for the policyd HTTP API.
use gatehouse_authz::{CapabilityModule, Grants, OperationRequirements, RawGrants};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HealthStatus {
    pub status: String,
    pub backend: String,
    pub durable_storage: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct ModuleView {
    pub key: String,
    pub display_name: String,
    pub allowed_actions: Vec<String>,
}

impl From<&CapabilityModule> for ModuleView {
    fn from(module: &CapabilityModule) -> Self {
        Self {
            key: module.key.to_string(),
            display_name: module.display_name.to_string(),
            allowed_actions: module
                .allowed_actions
                .iter()
                .map(|action| action.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ModuleListResponse {
    pub items: Vec<ModuleView>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct RolePermissions {
    pub role: String,
    /// Module key → granted actions.
    #[schema(value_type = Object)]
    pub grants: Grants,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct RolePermissionsListResponse {
    pub items: Vec<RolePermissions>,
}

/// Replacement grant set. Unknown modules and actions are dropped, not
/// rejected.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct UpdateRolePermissionsRequest {
    #[schema(value_type = Object)]
    pub grants: RawGrants,
}

/// Decision request. Supply either a registered `operation` id or explicit
/// `requirements`; when both are present the operation wins.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct AuthorizeRequest {
    pub role: String,
    #[serde(default)]
    pub operation: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub requirements: Option<OperationRequirements>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct AuthorizeResponse {
    pub allowed: bool,
    pub decision: String,
}
