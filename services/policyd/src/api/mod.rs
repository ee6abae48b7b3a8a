//! Policyd HTTP API module.
//!
//! Handlers resolve the calling actor's role from the `x-actor-role` header;
//! authentication happens upstream and is trusted here.
pub mod authorize;
pub mod error;
pub mod openapi;
pub mod permissions;
pub mod system;
pub mod types;

use crate::api::error::{ApiError, api_unauthorized};
use axum::http::HeaderMap;

pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

pub(crate) fn actor_role(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(ACTOR_ROLE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|role| !role.is_empty())
        .ok_or_else(|| api_unauthorized("missing actor role"))
}
