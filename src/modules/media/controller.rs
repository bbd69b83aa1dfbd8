use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use crate::middleware::role::{RequireAdmin, RequireTeacher, RequireViewer};
use crate::modules::audit::model::RequestContext;
use crate::modules::media::model::{
    CreateMediaDto, MediaFilterParams, MediaListResponse, MediaResponse, UpdateMediaDto,
};
use crate::modules::media::service::MediaService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::response::{DeletedResponse, ErrorResponse};
use crate::validator::ValidatedJson;

/// List media assets
#[utoipa::path(
    get,
    path = "/api/media",
    params(
        ("kind" = Option<String>, Query, description = "Filter by kind"),
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("limit" = Option<i64>, Query, description = "Page size (default 50)"),
        ("start_after" = Option<String>, Query, description = "Pagination cursor")
    ),
    responses(
        (status = 200, description = "List of media assets", body = MediaListResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Insufficient role", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Media"
)]
#[instrument(skip(state))]
pub async fn list_media(
    State(state): State<AppState>,
    RequireViewer(_auth): RequireViewer,
    Query(params): Query<MediaFilterParams>,
) -> Result<Json<MediaListResponse>, AppError> {
    let (data, meta) = MediaService::list(&state, &params).await?;
    Ok(Json(MediaListResponse {
        success: true,
        data,
        meta,
    }))
}

/// Get a media asset by id
#[utoipa::path(
    get,
    path = "/api/media/{id}",
    responses(
        (status = 200, description = "Media asset", body = MediaResponse),
        (status = 404, description = "Unknown media asset", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Media"
)]
#[instrument(skip(state))]
pub async fn get_media(
    State(state): State<AppState>,
    RequireViewer(_auth): RequireViewer,
    Path(id): Path<String>,
) -> Result<Json<MediaResponse>, AppError> {
    let media = MediaService::get(&state, &id).await?;
    Ok(Json(MediaResponse {
        success: true,
        media,
    }))
}

/// Register a media asset
#[utoipa::path(
    post,
    path = "/api/media",
    request_body = CreateMediaDto,
    responses(
        (status = 200, description = "Media asset registered", body = MediaResponse),
        (status = 400, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Media"
)]
#[instrument(skip(state, dto))]
pub async fn create_media(
    State(state): State<AppState>,
    RequireTeacher(auth): RequireTeacher,
    ctx: RequestContext,
    ValidatedJson(dto): ValidatedJson<CreateMediaDto>,
) -> Result<Json<MediaResponse>, AppError> {
    let media = MediaService::create(&state, &auth, &ctx, dto).await?;
    Ok(Json(MediaResponse {
        success: true,
        media,
    }))
}

/// Update a media asset
#[utoipa::path(
    put,
    path = "/api/media/{id}",
    request_body = UpdateMediaDto,
    responses(
        (status = 200, description = "Media asset updated", body = MediaResponse),
        (status = 404, description = "Unknown media asset", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Media"
)]
#[instrument(skip(state, dto))]
pub async fn update_media(
    State(state): State<AppState>,
    RequireTeacher(auth): RequireTeacher,
    ctx: RequestContext,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateMediaDto>,
) -> Result<Json<MediaResponse>, AppError> {
    let media = MediaService::update(&state, &auth, &ctx, &id, dto).await?;
    Ok(Json(MediaResponse {
        success: true,
        media,
    }))
}

/// Delete a media asset (admin only)
#[utoipa::path(
    delete,
    path = "/api/media/{id}",
    responses(
        (status = 200, description = "Media asset deleted", body = DeletedResponse),
        (status = 404, description = "Unknown media asset", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Media"
)]
#[instrument(skip(state))]
pub async fn delete_media(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, AppError> {
    MediaService::delete(&state, &auth, &ctx, &id).await?;
    Ok(Json(DeletedResponse::new(id)))
}
