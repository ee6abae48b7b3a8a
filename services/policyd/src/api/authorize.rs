//! Decision endpoint for services that delegate authorization to policyd.
use crate::api::error::{ApiError, api_validation_error};
use crate::api::types::{AuthorizeRequest, AuthorizeResponse, ErrorResponse};
use crate::app::AppState;
use axum::Json;
use axum::extract::State;

#[utoipa::path(
    post,
    path = "/v1/authorize",
    tag = "authorize",
    request_body = AuthorizeRequest,
    responses(
        (status = 200, description = "Authorization decision", body = AuthorizeResponse),
        (status = 400, description = "Neither operation nor requirements given", body = ErrorResponse)
    )
)]
pub(crate) async fn authorize(
    State(state): State<AppState>,
    Json(request): Json<AuthorizeRequest>,
) -> Result<Json<AuthorizeResponse>, ApiError> {
    let requirements = match (request.operation, request.requirements) {
        (Some(operation), _) => state.engine.registry().requirements(&operation),
        (None, Some(requirements)) => requirements,
        (None, None) => {
            return Err(api_validation_error(
                "either operation or requirements is required",
            ));
        }
    };
    let decision = state.engine.evaluate(&request.role, &requirements);
    Ok(Json(AuthorizeResponse {
        allowed: decision.is_allowed(),
        decision: decision.as_str().to_string(),
    }))
}
