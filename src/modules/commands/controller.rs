use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use crate::middleware::role::RequireAdmin;
use crate::modules::audit::model::RequestContext;
use crate::modules::commands::model::{
    CommandFilterParams, CommandListResponse, CommandResponse, CreateCommandDto,
};
use crate::modules::commands::service::CommandService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::response::ErrorResponse;
use crate::validator::ValidatedJson;

/// List logged commands (admin only)
#[utoipa::path(
    get,
    path = "/api/commands",
    params(
        ("action" = Option<String>, Query, description = "Filter by action"),
        ("status" = Option<String>, Query, description = "Filter by delivery status"),
        ("issued_by" = Option<String>, Query, description = "Filter by issuing user id"),
        ("start_date" = Option<String>, Query, description = "Issued at or after (RFC 3339 or YYYY-MM-DD)"),
        ("end_date" = Option<String>, Query, description = "Issued at or before (RFC 3339 or YYYY-MM-DD)"),
        ("limit" = Option<i64>, Query, description = "Page size (default 50)"),
        ("start_after" = Option<String>, Query, description = "Pagination cursor")
    ),
    responses(
        (status = 200, description = "List of commands", body = CommandListResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Insufficient role", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Commands"
)]
#[instrument(skip(state))]
pub async fn list_commands(
    State(state): State<AppState>,
    RequireAdmin(_auth): RequireAdmin,
    Query(params): Query<CommandFilterParams>,
) -> Result<Json<CommandListResponse>, AppError> {
    let (data, meta) = CommandService::list(&state, &params).await?;
    Ok(Json(CommandListResponse {
        success: true,
        data,
        meta,
    }))
}

/// Get a logged command by id (admin only)
#[utoipa::path(
    get,
    path = "/api/commands/{id}",
    responses(
        (status = 200, description = "Command", body = CommandResponse),
        (status = 404, description = "Unknown command", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Commands"
)]
#[instrument(skip(state))]
pub async fn get_command(
    State(state): State<AppState>,
    RequireAdmin(_auth): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<CommandResponse>, AppError> {
    let command = CommandService::get(&state, &id).await?;
    Ok(Json(CommandResponse {
        success: true,
        command,
    }))
}

/// Issue a command (admin only). The log is append-only.
#[utoipa::path(
    post,
    path = "/api/commands",
    request_body = CreateCommandDto,
    responses(
        (status = 200, description = "Command logged", body = CommandResponse),
        (status = 400, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Commands"
)]
#[instrument(skip(state, dto))]
pub async fn create_command(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    ctx: RequestContext,
    ValidatedJson(dto): ValidatedJson<CreateCommandDto>,
) -> Result<Json<CommandResponse>, AppError> {
    let command = CommandService::create(&state, &auth, &ctx, dto).await?;
    Ok(Json(CommandResponse {
        success: true,
        command,
    }))
}
