use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use crate::middleware::role::{RequireAdmin, RequireTeacher, RequireViewer};
use crate::modules::audit::model::RequestContext;
use crate::modules::onboarding::model::{
    CreateSurveyDto, SurveyFilterParams, SurveyListResponse, SurveyResponse, UpdateSurveyDto,
};
use crate::modules::onboarding::service::OnboardingService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::response::{DeletedResponse, ErrorResponse};
use crate::validator::ValidatedJson;

/// List onboarding surveys
#[utoipa::path(
    get,
    path = "/api/onboarding",
    params(
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("limit" = Option<i64>, Query, description = "Page size (default 50)"),
        ("start_after" = Option<String>, Query, description = "Pagination cursor")
    ),
    responses(
        (status = 200, description = "List of surveys", body = SurveyListResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Insufficient role", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Onboarding"
)]
#[instrument(skip(state))]
pub async fn list_surveys(
    State(state): State<AppState>,
    RequireViewer(_auth): RequireViewer,
    Query(params): Query<SurveyFilterParams>,
) -> Result<Json<SurveyListResponse>, AppError> {
    let (data, meta) = OnboardingService::list(&state, &params).await?;
    Ok(Json(SurveyListResponse {
        success: true,
        data,
        meta,
    }))
}

/// Get an onboarding survey by id
#[utoipa::path(
    get,
    path = "/api/onboarding/{id}",
    responses(
        (status = 200, description = "Survey", body = SurveyResponse),
        (status = 404, description = "Unknown survey", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Onboarding"
)]
#[instrument(skip(state))]
pub async fn get_survey(
    State(state): State<AppState>,
    RequireViewer(_auth): RequireViewer,
    Path(id): Path<String>,
) -> Result<Json<SurveyResponse>, AppError> {
    let survey = OnboardingService::get(&state, &id).await?;
    Ok(Json(SurveyResponse {
        success: true,
        survey,
    }))
}

/// Create an onboarding survey
#[utoipa::path(
    post,
    path = "/api/onboarding",
    request_body = CreateSurveyDto,
    responses(
        (status = 200, description = "Survey created", body = SurveyResponse),
        (status = 400, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Onboarding"
)]
#[instrument(skip(state, dto))]
pub async fn create_survey(
    State(state): State<AppState>,
    RequireTeacher(auth): RequireTeacher,
    ctx: RequestContext,
    ValidatedJson(dto): ValidatedJson<CreateSurveyDto>,
) -> Result<Json<SurveyResponse>, AppError> {
    let survey = OnboardingService::create(&state, &auth, &ctx, dto).await?;
    Ok(Json(SurveyResponse {
        success: true,
        survey,
    }))
}

/// Update an onboarding survey
#[utoipa::path(
    put,
    path = "/api/onboarding/{id}",
    request_body = UpdateSurveyDto,
    responses(
        (status = 200, description = "Survey updated", body = SurveyResponse),
        (status = 404, description = "Unknown survey", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Onboarding"
)]
#[instrument(skip(state, dto))]
pub async fn update_survey(
    State(state): State<AppState>,
    RequireTeacher(auth): RequireTeacher,
    ctx: RequestContext,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateSurveyDto>,
) -> Result<Json<SurveyResponse>, AppError> {
    let survey = OnboardingService::update(&state, &auth, &ctx, &id, dto).await?;
    Ok(Json(SurveyResponse {
        success: true,
        survey,
    }))
}

/// Delete an onboarding survey (admin only)
#[utoipa::path(
    delete,
    path = "/api/onboarding/{id}",
    responses(
        (status = 200, description = "Survey deleted", body = DeletedResponse),
        (status = 404, description = "Unknown survey", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Onboarding"
)]
#[instrument(skip(state))]
pub async fn delete_survey(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, AppError> {
    OnboardingService::delete(&state, &auth, &ctx, &id).await?;
    Ok(Json(DeletedResponse::new(id)))
}
