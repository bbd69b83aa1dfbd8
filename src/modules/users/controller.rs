use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use crate::middleware::role::{RequireAdmin, RequireTeacher};
use crate::modules::audit::model::RequestContext;
use crate::modules::users::model::{
    CreateUserDto, SetRoleDto, UpdateUserDto, UserFilterParams, UserListResponse, UserResponse,
};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::response::{DeletedResponse, ErrorResponse};
use crate::validator::ValidatedJson;

/// List user accounts
#[utoipa::path(
    get,
    path = "/api/users",
    params(
        ("role" = Option<String>, Query, description = "Filter by role"),
        ("email" = Option<String>, Query, description = "Filter by exact email"),
        ("limit" = Option<i64>, Query, description = "Page size (default 50)"),
        ("start_after" = Option<String>, Query, description = "Pagination cursor")
    ),
    responses(
        (status = 200, description = "List of users", body = UserListResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse),
        (status = 403, description = "Insufficient role", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    RequireTeacher(_auth): RequireTeacher,
    Query(params): Query<UserFilterParams>,
) -> Result<Json<UserListResponse>, AppError> {
    let (data, meta) = UserService::list(&state, &params).await?;
    Ok(Json(UserListResponse {
        success: true,
        data,
        meta,
    }))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "Unknown user", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    RequireTeacher(_auth): RequireTeacher,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserService::get(&state, &id).await?;
    Ok(Json(UserResponse {
        success: true,
        user,
    }))
}

/// Create a user account (admin only)
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserDto,
    responses(
        (status = 200, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    ctx: RequestContext,
    ValidatedJson(dto): ValidatedJson<CreateUserDto>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserService::create(&state, &auth, &ctx, dto).await?;
    Ok(Json(UserResponse {
        success: true,
        user,
    }))
}

/// Update a user's profile (admin only)
#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "Unknown user", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    ctx: RequestContext,
    Path(id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateUserDto>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserService::update(&state, &auth, &ctx, &id, dto).await?;
    Ok(Json(UserResponse {
        success: true,
        user,
    }))
}

/// Change a user's role (admin only)
#[utoipa::path(
    patch,
    path = "/api/users/{id}/role",
    request_body = SetRoleDto,
    responses(
        (status = 200, description = "Role changed", body = UserResponse),
        (status = 403, description = "Self-demotion refused", body = ErrorResponse),
        (status = 404, description = "Unknown user", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn set_user_role(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    ctx: RequestContext,
    Path(id): Path<String>,
    Json(dto): Json<SetRoleDto>,
) -> Result<Json<UserResponse>, AppError> {
    let user = UserService::set_role(&state, &auth, &ctx, &id, dto).await?;
    Ok(Json(UserResponse {
        success: true,
        user,
    }))
}

/// Delete a user account (admin only)
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    responses(
        (status = 200, description = "User deleted", body = DeletedResponse),
        (status = 404, description = "Unknown user", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, AppError> {
    UserService::delete(&state, &auth, &ctx, &id).await?;
    Ok(Json(DeletedResponse::new(id)))
}
