use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use crate::middleware::role::{RequireAdmin, RequireTeacher, RequireViewer};
use crate::modules::audit::model::RequestContext;
use crate::modules::lessons::model::{
    CreateLessonDto, LessonFilterParams, LessonListResponse, LessonResponse, UpdateLessonDto,
};
use crate::modules::lessons::service::LessonService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::response::{DeletedResponse, ErrorResponse};
use crate::validator::ValidatedJson;

/// List lessons, ordered by in-program position
#[utoipa::path(
    get,
    path = "/api/lessons",
    params(
        ("program_id" = Option<String>, Query, description = "Filter by program"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("limit" = Option<i64>, Query, description = "Page size (default 50)"),
        ("start_after" = Option<String>, Query, description = "Pagination cursor")
    ),
    responses(
        (status = 200, description = "List of lessons", body = LessonListResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Insufficient role", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Lessons"
)]
#[instrument(skip(state))]
pub async fn list_lessons(
    State(state): State<AppState>,
    RequireViewer(_auth): RequireViewer,
    Query(params): Query<LessonFilterParams>,
) -> Result<Json<LessonListResponse>, AppError> {
    let (data, meta) = LessonService::list(&state, &params).await?;
    Ok(Json(LessonListResponse {
        success: true,
        data,
        meta,
    }))
}

/// Get a lesson by id
#[utoipa::path(
    get,
    path = "/api/lessons/{id}",
    responses(
        (status = 200, description = "Lesson", body = LessonResponse),
        (status = 404, description = "Unknown lesson", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Lessons"
)]
#[instrument(skip(state))]
pub async fn get_lesson(
    State(state): State<AppState>,
    RequireViewer(_auth): RequireViewer,
    Path(id): Path<String>,
) -> Result<Json<LessonResponse>, AppError> {
    let lesson = LessonService::get(&state, &id).await?;
    Ok(Json(LessonResponse {
        success: true,
        lesson,
    }))
}

/// Create a lesson
#[utoipa::path(
    post,
    path = "/api/lessons",
    request_body = CreateLessonDto,
    responses(
        (status = 200, description = "Lesson created", body = LessonResponse),
        (status = 400, description = "Validation error or unknown program", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Lessons"
)]
#[instrument(skip(state, dto))]
pub async fn create_lesson(
    State(state): State<AppState>,
    RequireTeacher(auth): RequireTeacher,
    ctx: RequestContext,
    ValidatedJson(dto): ValidatedJson<CreateLessonDto>,
) -> Result<Json<LessonResponse>, AppError> {
    let lesson = LessonService::create(&state, &auth, &ctx, dto).await?;
    Ok(Json(LessonResponse {
        success: true,
        lesson,
    }))
}

/// Update a lesson
#[utoipa::path(
    put,
    path = "/api/lessons/{id}",
    request_body = UpdateLessonDto,
    responses(
        (status = 200, description = "Lesson updated", body = LessonResponse),
        (status = 404, description = "Unknown lesson", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Lessons"
)]
#[instrument(skip(state, dto))]
pub async fn update_lesson(
    State(state): State<AppState>,
    RequireTeacher(auth): RequireTeacher,
    ctx: RequestContext,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateLessonDto>,
) -> Result<Json<LessonResponse>, AppError> {
    let lesson = LessonService::update(&state, &auth, &ctx, &id, dto).await?;
    Ok(Json(LessonResponse {
        success: true,
        lesson,
    }))
}

/// Delete a lesson (admin only)
#[utoipa::path(
    delete,
    path = "/api/lessons/{id}",
    responses(
        (status = 200, description = "Lesson deleted", body = DeletedResponse),
        (status = 404, description = "Unknown lesson", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Lessons"
)]
#[instrument(skip(state))]
pub async fn delete_lesson(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, AppError> {
    LessonService::delete(&state, &auth, &ctx, &id).await?;
    Ok(Json(DeletedResponse::new(id)))
}
