//! Permission administration endpoints.
//!
//! Each handler is gated by the engine it administers: reads need
//! `users.read`, replacing a role's grants needs `users.update`.
use crate::api::actor_role;
use crate::api::error::{ApiError, api_validation_error};
use crate::api::types::{
    ErrorResponse, ModuleListResponse, ModuleView, RolePermissions, RolePermissionsListResponse,
    UpdateRolePermissionsRequest,
};
use crate::app::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use gatehouse_authz::Role;

#[utoipa::path(
    get,
    path = "/v1/permissions/modules",
    tag = "permissions",
    params(("x-actor-role" = String, Header, description = "Role of the calling actor")),
    responses(
        (status = 200, description = "Capability taxonomy", body = ModuleListResponse),
        (status = 401, description = "Missing actor role", body = ErrorResponse),
        (status = 403, description = "Actor may not read permissions", body = ErrorResponse)
    )
)]
pub(crate) async fn list_modules(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ModuleListResponse>, ApiError> {
    let actor = actor_role(&headers)?;
    let modules = state.admin.list_modules(actor)?;
    Ok(Json(ModuleListResponse {
        items: modules.iter().map(ModuleView::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/v1/permissions/roles",
    tag = "permissions",
    params(("x-actor-role" = String, Header, description = "Role of the calling actor")),
    responses(
        (status = 200, description = "Grants for every known role", body = RolePermissionsListResponse),
        (status = 401, description = "Missing actor role", body = ErrorResponse),
        (status = 403, description = "Actor may not read permissions", body = ErrorResponse)
    )
)]
pub(crate) async fn list_role_permissions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RolePermissionsListResponse>, ApiError> {
    let actor = actor_role(&headers)?;
    let items = state
        .admin
        .list_all_role_permissions(actor)?
        .into_iter()
        .map(|(role, grants)| RolePermissions {
            role: role.to_string(),
            grants,
        })
        .collect();
    Ok(Json(RolePermissionsListResponse { items }))
}

#[utoipa::path(
    get,
    path = "/v1/permissions/roles/{role}",
    tag = "permissions",
    params(
        ("role" = String, Path, description = "Role name"),
        ("x-actor-role" = String, Header, description = "Role of the calling actor")
    ),
    responses(
        (status = 200, description = "Grants for the role, empty when unknown", body = RolePermissions),
        (status = 401, description = "Missing actor role", body = ErrorResponse),
        (status = 403, description = "Actor may not read permissions", body = ErrorResponse)
    )
)]
pub(crate) async fn get_role_permissions(
    State(state): State<AppState>,
    Path(role): Path<String>,
    headers: HeaderMap,
) -> Result<Json<RolePermissions>, ApiError> {
    let actor = actor_role(&headers)?;
    let grants = state.admin.get_role_permissions(actor, &role)?;
    Ok(Json(RolePermissions { role, grants }))
}

#[utoipa::path(
    put,
    path = "/v1/permissions/roles/{role}",
    tag = "permissions",
    params(
        ("role" = String, Path, description = "Role name"),
        ("x-actor-role" = String, Header, description = "Role of the calling actor")
    ),
    request_body = UpdateRolePermissionsRequest,
    responses(
        (status = 200, description = "Grants as stored after filtering", body = RolePermissions),
        (status = 400, description = "Invalid role name", body = ErrorResponse),
        (status = 401, description = "Missing actor role", body = ErrorResponse),
        (status = 403, description = "Actor may not update permissions", body = ErrorResponse),
        (status = 503, description = "Permission store unavailable", body = ErrorResponse)
    )
)]
pub(crate) async fn update_role_permissions(
    State(state): State<AppState>,
    Path(role): Path<String>,
    headers: HeaderMap,
    Json(body): Json<UpdateRolePermissionsRequest>,
) -> Result<Json<RolePermissions>, ApiError> {
    let actor = actor_role(&headers)?;
    if role.trim().is_empty() {
        return Err(api_validation_error("role must not be empty"));
    }
    let role = Role::new(role);
    let grants = state
        .admin
        .update_role_permissions(actor, &role, &body.grants)
        .await?;
    Ok(Json(RolePermissions {
        role: role.to_string(),
        grants,
    }))
}
