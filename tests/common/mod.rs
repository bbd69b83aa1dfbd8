use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use coursebase::config::cors::CorsConfig;
use coursebase::config::jwt::JwtConfig;
use coursebase::modules::users::model::UserRole;
use coursebase::router::init_router;
use coursebase::state::AppState;
use coursebase::store::{DocumentStore, MemoryStore};
use coursebase::utils::jwt::create_access_token;
use http_body_util::BodyExt;

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        access_token_expiry: 3600,
    }
}

pub fn test_state(store: Arc<dyn DocumentStore>) -> AppState {
    AppState::with_store(
        store,
        test_jwt_config(),
        CorsConfig {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        },
    )
}

/// An app wired to a fresh in-memory store, plus a handle to that store for
/// direct assertions.
pub fn test_app() -> (axum::Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let app = init_router(test_state(store.clone()));
    (app, store)
}

pub fn token_for(role: UserRole, user_id: &str) -> String {
    create_access_token(user_id, "test@example.com", &role, &test_jwt_config()).unwrap()
}

pub fn request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
