//! OpenAPI document for the policyd API.
use crate::api::types::{
    AuthorizeRequest, AuthorizeResponse, ErrorResponse, HealthStatus, ModuleListResponse,
    ModuleView, RolePermissions, RolePermissionsListResponse, UpdateRolePermissionsRequest,
};
use crate::api::{authorize, permissions, system};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "gatehouse-policyd",
        version = "v1",
        description = "Role and capability authorization service"
    ),
    paths(
        system::system_health,
        permissions::list_modules,
        permissions::list_role_permissions,
        permissions::get_role_permissions,
        permissions::update_role_permissions,
        authorize::authorize
    ),
    components(schemas(
        ErrorResponse,
        HealthStatus,
        ModuleView,
        ModuleListResponse,
        RolePermissions,
        RolePermissionsListResponse,
        UpdateRolePermissionsRequest,
        AuthorizeRequest,
        AuthorizeResponse
    )),
    tags(
        (name = "system", description = "Service health"),
        (name = "permissions", description = "Role permission administration"),
        (name = "authorize", description = "Authorization decisions")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;
        for path in [
            "/v1/system/health",
            "/v1/permissions/modules",
            "/v1/permissions/roles",
            "/v1/permissions/roles/{role}",
            "/v1/authorize",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
    }
}
