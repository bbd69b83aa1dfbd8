use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::middleware::auth::AuthUser;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::response::ErrorResponse;

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub success: bool,
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
}

/// The verified identity behind the presented token
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Caller identity", body = MeResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
#[instrument(skip(_state))]
pub async fn me(
    State(_state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<MeResponse>, AppError> {
    Ok(Json(MeResponse {
        success: true,
        user_id: auth.user_id().to_string(),
        email: auth.email().to_string(),
        role: auth.role(),
    }))
}
