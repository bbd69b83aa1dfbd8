use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::modules::audit::init_audit_router;
use crate::modules::auth::init_auth_router;
use crate::modules::commands::init_commands_router;
use crate::modules::lessons::init_lessons_router;
use crate::modules::media::init_media_router;
use crate::modules::onboarding::init_onboarding_router;
use crate::modules::programs::init_programs_router;
use crate::modules::users::init_users_router;
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{Json, Router, middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"success": true, "status": "ok"}))
}

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/health", get(health))
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest("/users", init_users_router())
                .nest("/programs", init_programs_router())
                .nest("/lessons", init_lessons_router())
                .nest("/media", init_media_router())
                .nest("/onboarding", init_onboarding_router())
                .nest("/commands", init_commands_router())
                .nest("/audit", init_audit_router()),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
