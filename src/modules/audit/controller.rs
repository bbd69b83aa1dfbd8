use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use crate::middleware::role::RequireAdmin;
use crate::modules::audit::model::{
    AuditEntryResponse, AuditFilterParams, AuditListResponse,
};
use crate::modules::audit::service::AuditService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::response::ErrorResponse;

/// List audit entries (admin only)
#[utoipa::path(
    get,
    path = "/api/audit",
    params(
        ("resource_type" = Option<String>, Query, description = "Filter by resource type"),
        ("action" = Option<String>, Query, description = "Filter by action"),
        ("actor_id" = Option<String>, Query, description = "Filter by actor id"),
        ("start_date" = Option<String>, Query, description = "RFC 3339 timestamp or YYYY-MM-DD"),
        ("end_date" = Option<String>, Query, description = "RFC 3339 timestamp or YYYY-MM-DD"),
        ("limit" = Option<i64>, Query, description = "Page size (default 50)"),
        ("start_after" = Option<String>, Query, description = "Pagination cursor")
    ),
    responses(
        (status = 200, description = "Audit entries", body = AuditListResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Insufficient role", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Audit"
)]
#[instrument(skip(state))]
pub async fn list_audit_entries(
    State(state): State<AppState>,
    RequireAdmin(_auth): RequireAdmin,
    Query(params): Query<AuditFilterParams>,
) -> Result<Json<AuditListResponse>, AppError> {
    let (data, meta) = AuditService::list(&state, &params).await?;
    Ok(Json(AuditListResponse {
        success: true,
        data,
        meta,
    }))
}

/// Get a single audit entry (admin only)
#[utoipa::path(
    get,
    path = "/api/audit/{id}",
    responses(
        (status = 200, description = "Audit entry", body = AuditEntryResponse),
        (status = 404, description = "Unknown entry", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Audit"
)]
#[instrument(skip(state))]
pub async fn get_audit_entry(
    State(state): State<AppState>,
    RequireAdmin(_auth): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<AuditEntryResponse>, AppError> {
    let entry = AuditService::get(&state, &id).await?;
    Ok(Json(AuditEntryResponse {
        success: true,
        entry,
    }))
}
