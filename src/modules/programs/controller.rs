use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use crate::middleware::role::{RequireAdmin, RequireTeacher, RequireViewer};
use crate::modules::audit::model::RequestContext;
use crate::modules::programs::model::{
    CreateProgramDto, ProgramFilterParams, ProgramListResponse, ProgramResponse, UpdateProgramDto,
};
use crate::modules::programs::service::ProgramService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::response::{DeletedResponse, ErrorResponse};
use crate::validator::ValidatedJson;

/// List programs
#[utoipa::path(
    get,
    path = "/api/programs",
    params(
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("limit" = Option<i64>, Query, description = "Page size (default 50)"),
        ("start_after" = Option<String>, Query, description = "Pagination cursor")
    ),
    responses(
        (status = 200, description = "List of programs", body = ProgramListResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Insufficient role", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Programs"
)]
#[instrument(skip(state))]
pub async fn list_programs(
    State(state): State<AppState>,
    RequireViewer(_auth): RequireViewer,
    Query(params): Query<ProgramFilterParams>,
) -> Result<Json<ProgramListResponse>, AppError> {
    let (data, meta) = ProgramService::list(&state, &params).await?;
    Ok(Json(ProgramListResponse {
        success: true,
        data,
        meta,
    }))
}

/// Get a program by id
#[utoipa::path(
    get,
    path = "/api/programs/{id}",
    responses(
        (status = 200, description = "Program", body = ProgramResponse),
        (status = 404, description = "Unknown program", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Programs"
)]
#[instrument(skip(state))]
pub async fn get_program(
    State(state): State<AppState>,
    RequireViewer(_auth): RequireViewer,
    Path(id): Path<String>,
) -> Result<Json<ProgramResponse>, AppError> {
    let program = ProgramService::get(&state, &id).await?;
    Ok(Json(ProgramResponse {
        success: true,
        program,
    }))
}

/// Create a program
#[utoipa::path(
    post,
    path = "/api/programs",
    request_body = CreateProgramDto,
    responses(
        (status = 200, description = "Program created", body = ProgramResponse),
        (status = 400, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Programs"
)]
#[instrument(skip(state, dto))]
pub async fn create_program(
    State(state): State<AppState>,
    RequireTeacher(auth): RequireTeacher,
    ctx: RequestContext,
    ValidatedJson(dto): ValidatedJson<CreateProgramDto>,
) -> Result<Json<ProgramResponse>, AppError> {
    let program = ProgramService::create(&state, &auth, &ctx, dto).await?;
    Ok(Json(ProgramResponse {
        success: true,
        program,
    }))
}

/// Update a program
#[utoipa::path(
    put,
    path = "/api/programs/{id}",
    request_body = UpdateProgramDto,
    responses(
        (status = 200, description = "Program updated", body = ProgramResponse),
        (status = 404, description = "Unknown program", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Programs"
)]
#[instrument(skip(state, dto))]
pub async fn update_program(
    State(state): State<AppState>,
    RequireTeacher(auth): RequireTeacher,
    ctx: RequestContext,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateProgramDto>,
) -> Result<Json<ProgramResponse>, AppError> {
    let program = ProgramService::update(&state, &auth, &ctx, &id, dto).await?;
    Ok(Json(ProgramResponse {
        success: true,
        program,
    }))
}

/// Delete a program (admin only)
#[utoipa::path(
    delete,
    path = "/api/programs/{id}",
    responses(
        (status = 200, description = "Program deleted", body = DeletedResponse),
        (status = 404, description = "Unknown program", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Programs"
)]
#[instrument(skip(state))]
pub async fn delete_program(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, AppError> {
    ProgramService::delete(&state, &auth, &ctx, &id).await?;
    Ok(Json(DeletedResponse::new(id)))
}
