mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::{body_json, request, test_app, test_jwt_config, test_state, token_for};
use coursebase::modules::users::model::UserRole;
use coursebase::router::init_router;
use coursebase::store::{
    Document, DocumentStore, ListQuery, MemoryStore, Page, StoreError,
};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn create_program(app: &axum::Router, token: &str, title: &str) -> String {
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/programs",
            Some(token),
            Some(json!({"title": title, "description": "A program"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["program"]["id"].as_str().unwrap().to_string()
}

async fn audit_entries_with_action(app: &axum::Router, admin_token: &str, action: &str) -> Vec<Value> {
    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/audit?action={}", action),
            Some(admin_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["data"].as_array().unwrap().clone()
}

#[tokio::test]
async fn test_health_requires_no_auth() {
    let (app, _store) = test_app();

    let response = app
        .oneshot(request("GET", "/health", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_missing_token_is_rejected_without_mutation() {
    let (app, store) = test_app();

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/programs",
            None,
            Some(json!({"title": "T", "description": "D"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);

    let page = store.list("programs", ListQuery::new(10)).await.unwrap();
    assert!(page.documents.is_empty());
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let (app, _store) = test_app();

    let response = app
        .oneshot(request(
            "GET",
            "/api/programs",
            Some("not.a.token"),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_viewer_cannot_create_program() {
    let (app, store) = test_app();
    let viewer = token_for(UserRole::Viewer, "viewer-1");

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/programs",
            Some(&viewer),
            Some(json!({"title": "T", "description": "D"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let page = store.list("programs", ListQuery::new(10)).await.unwrap();
    assert!(page.documents.is_empty());
}

#[tokio::test]
async fn test_teacher_cannot_delete_program() {
    let (app, _store) = test_app();
    let teacher = token_for(UserRole::Teacher, "teacher-1");
    let id = create_program(&app, &teacher, "Keep me").await;

    let response = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/api/programs/{}", id),
            Some(&teacher),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_program_crud_round_trip() {
    let (app, _store) = test_app();
    let teacher = token_for(UserRole::Teacher, "teacher-1");
    let admin = token_for(UserRole::Admin, "admin-1");

    let id = create_program(&app, &teacher, "Rust 101").await;

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/programs/{}", id),
            Some(&teacher),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["program"]["title"], "Rust 101");
    assert_eq!(body["program"]["status"], "draft");

    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/api/programs/{}", id),
            Some(&teacher),
            Some(json!({"status": "published"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["program"]["status"], "published");
    assert_eq!(body["program"]["title"], "Rust 101");

    let response = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/api/programs/{}", id),
            Some(&admin),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(request(
            "GET",
            &format!("/api/programs/{}", id),
            Some(&teacher),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_program_validation_error() {
    let (app, _store) = test_app();
    let teacher = token_for(UserRole::Teacher, "teacher-1");

    let response = app
        .oneshot(request(
            "POST",
            "/api/programs",
            Some(&teacher),
            Some(json!({"title": "", "description": "D"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_update_with_no_fields_is_rejected() {
    let (app, _store) = test_app();
    let teacher = token_for(UserRole::Teacher, "teacher-1");
    let id = create_program(&app, &teacher, "P").await;

    let response = app
        .oneshot(request(
            "PUT",
            &format!("/api/programs/{}", id),
            Some(&teacher),
            Some(json!({})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_lesson_requires_known_program() {
    let (app, _store) = test_app();
    let teacher = token_for(UserRole::Teacher, "teacher-1");

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/lessons",
            Some(&teacher),
            Some(json!({"title": "L", "program_id": "no-such-program"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let program_id = create_program(&app, &teacher, "Parent").await;
    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/lessons",
            Some(&teacher),
            Some(json!({"title": "L", "program_id": program_id})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["lesson"]["status"], "draft");
    assert_eq!(body["lesson"]["position"], 0);
}

#[tokio::test]
async fn test_admin_delete_writes_audit_entry() {
    let (app, _store) = test_app();
    let teacher = token_for(UserRole::Teacher, "teacher-1");
    let admin = token_for(UserRole::Admin, "admin-1");
    let id = create_program(&app, &teacher, "Doomed").await;

    let response = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/api/programs/{}", id),
            Some(&admin),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Deletion audit writes are awaited, so the entry is visible immediately.
    let entries = audit_entries_with_action(&app, &admin, "program.deleted").await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["resource_id"], id);
    assert_eq!(entries[0]["actor_id"], "admin-1");
    assert_eq!(entries[0]["before"]["title"], "Doomed");
}

#[tokio::test]
async fn test_background_audit_entry_eventually_written() {
    let (app, _store) = test_app();
    let teacher = token_for(UserRole::Teacher, "teacher-1");
    let admin = token_for(UserRole::Admin, "admin-1");
    let id = create_program(&app, &teacher, "Watched").await;

    let mut entries = Vec::new();
    for _ in 0..100 {
        entries = audit_entries_with_action(&app, &admin, "program.created").await;
        if !entries.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["resource_id"], id);
    assert_eq!(entries[0]["after"]["title"], "Watched");
}

#[tokio::test]
async fn test_audit_log_is_admin_only() {
    let (app, _store) = test_app();
    let teacher = token_for(UserRole::Teacher, "teacher-1");

    let response = app
        .oneshot(request("GET", "/api/audit", Some(&teacher), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_cannot_demote_self() {
    let (app, store) = test_app();
    let admin = token_for(UserRole::Admin, "admin-1");

    let response = app
        .oneshot(request(
            "PATCH",
            "/api/users/admin-1/role",
            Some(&admin),
            Some(json!({"role": "viewer"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let page = store.list("audit_logs", ListQuery::new(10)).await.unwrap();
    assert!(page.documents.is_empty());
}

#[tokio::test]
async fn test_set_role_unknown_user_is_404_without_audit() {
    let (app, store) = test_app();
    let admin = token_for(UserRole::Admin, "admin-1");

    let response = app
        .oneshot(request(
            "PATCH",
            "/api/users/no-such-user/role",
            Some(&admin),
            Some(json!({"role": "teacher"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let page = store.list("audit_logs", ListQuery::new(10)).await.unwrap();
    assert!(page.documents.is_empty());
}

#[tokio::test]
async fn test_role_change_round_trip_with_audit() {
    let (app, _store) = test_app();
    let admin = token_for(UserRole::Admin, "admin-1");

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/users",
            Some(&admin),
            Some(json!({"display_name": "Ada", "email": "ada@example.com"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let user_id = body["user"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["role"], "user");

    let response = app
        .clone()
        .oneshot(request(
            "PATCH",
            &format!("/api/users/{}/role", user_id),
            Some(&admin),
            Some(json!({"role": "teacher"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["role"], "teacher");

    let entries = audit_entries_with_action(&app, &admin, "user.role_changed").await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["before"]["role"], "user");
    assert_eq!(entries[0]["after"]["role"], "teacher");
}

#[tokio::test]
async fn test_pagination_walks_all_programs() {
    let (app, store) = test_app();
    let viewer = token_for(UserRole::Viewer, "viewer-1");

    for i in 0..5 {
        store
            .insert(
                "programs",
                json!({"title": format!("p{i}"), "description": "d"}),
            )
            .await
            .unwrap();
    }

    let mut seen = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let uri = match &cursor {
            Some(c) => format!("/api/programs?limit=2&start_after={}", c),
            None => "/api/programs?limit=2".to_string(),
        };
        let response = app
            .clone()
            .oneshot(request("GET", &uri, Some(&viewer), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        for item in body["data"].as_array().unwrap() {
            seen.push(item["id"].as_str().unwrap().to_string());
        }
        if body["meta"]["has_more"] != true {
            break;
        }
        cursor = Some(body["meta"]["next_cursor"].as_str().unwrap().to_string());
    }

    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 5);
}

#[tokio::test]
async fn test_invalid_cursor_is_rejected() {
    let (app, store) = test_app();
    let viewer = token_for(UserRole::Viewer, "viewer-1");
    store
        .insert("programs", json!({"title": "p", "description": "d"}))
        .await
        .unwrap();

    let response = app
        .oneshot(request(
            "GET",
            "/api/programs?start_after=bogus-cursor",
            Some(&viewer),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Delegates to a `MemoryStore` but fails every ordered list query, the way a
/// backend missing a composite index would.
struct OrderFailingStore(MemoryStore);

#[async_trait]
impl DocumentStore for OrderFailingStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        self.0.get(collection, id).await
    }

    async fn insert(&self, collection: &str, data: Value) -> Result<Document, StoreError> {
        self.0.insert(collection, data).await
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Value,
    ) -> Result<Option<Document>, StoreError> {
        self.0.update(collection, id, patch).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        self.0.delete(collection, id).await
    }

    async fn list(&self, collection: &str, query: ListQuery) -> Result<Page, StoreError> {
        if query.order_by.is_some() {
            return Err(StoreError::Backend(anyhow::anyhow!(
                "ordered queries unsupported"
            )));
        }
        self.0.list(collection, query).await
    }
}

#[tokio::test]
async fn test_ordered_lesson_list_falls_back_to_unordered() {
    let memory = MemoryStore::new();
    memory
        .insert("lessons", json!({"title": "b", "program_id": "p1", "position": 2}))
        .await
        .unwrap();
    memory
        .insert("lessons", json!({"title": "a", "program_id": "p1", "position": 1}))
        .await
        .unwrap();
    let app = init_router(test_state(Arc::new(OrderFailingStore(memory))));
    let viewer = token_for(UserRole::Viewer, "viewer-1");

    let response = app
        .oneshot(request("GET", "/api/lessons", Some(&viewer), None))
        .await
        .unwrap();

    // Degraded ordering, not a 500.
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_onboarding_question_rules() {
    let (app, _store) = test_app();
    let teacher = token_for(UserRole::Teacher, "teacher-1");

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/onboarding",
            Some(&teacher),
            Some(json!({
                "title": "Welcome",
                "questions": [
                    {"prompt": "Pick one", "kind": "multiple_choice", "options": []}
                ]
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/onboarding",
            Some(&teacher),
            Some(json!({
                "title": "Welcome",
                "questions": [
                    {"prompt": "Pick one", "kind": "multiple_choice", "options": ["a", "b"]},
                    {"prompt": "How confident?", "kind": "slider"},
                    {"prompt": "Comments?", "kind": "text"}
                ]
            })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["survey"]["questions"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_command_log_is_append_only_and_admin_gated() {
    let (app, _store) = test_app();
    let admin = token_for(UserRole::Admin, "admin-1");
    let teacher = token_for(UserRole::Teacher, "teacher-1");

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/commands",
            Some(&teacher),
            Some(json!({"action": "refresh_content"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(request(
            "POST",
            "/api/commands",
            Some(&admin),
            Some(json!({"action": "refresh_content", "payload": {"scope": "all"}})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let id = body["command"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["command"]["status"], "pending");
    assert_eq!(body["command"]["issued_by"], "admin-1");

    // No update or delete routes exist.
    let response = app
        .clone()
        .oneshot(request(
            "PUT",
            &format!("/api/commands/{}", id),
            Some(&admin),
            Some(json!({"status": "completed"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = app
        .clone()
        .oneshot(request(
            "DELETE",
            &format!("/api/commands/{}", id),
            Some(&admin),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_auth_me_reports_identity() {
    let (app, _store) = test_app();
    let teacher = token_for(UserRole::Teacher, "teacher-1");

    let response = app
        .oneshot(request("GET", "/api/auth/me", Some(&teacher), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user_id"], "teacher-1");
    assert_eq!(body["role"], "teacher");
}

#[derive(serde::Serialize)]
struct LegacyClaims {
    sub: String,
    email: String,
    exp: usize,
    iat: usize,
}

#[tokio::test]
async fn test_auth_me_defaults_missing_role_to_user() {
    let (app, _store) = test_app();
    let now = chrono::Utc::now().timestamp() as usize;
    let token = encode(
        &Header::default(),
        &LegacyClaims {
            sub: "uid-legacy".to_string(),
            email: "legacy@example.com".to_string(),
            exp: now + 3600,
            iat: now,
        },
        &EncodingKey::from_secret(test_jwt_config().secret.as_bytes()),
    )
    .unwrap();

    let response = app
        .oneshot(request("GET", "/api/auth/me", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["role"], "user");
}

#[tokio::test]
async fn test_media_filters_by_kind() {
    let (app, store) = test_app();
    let viewer = token_for(UserRole::Viewer, "viewer-1");

    store
        .insert(
            "media",
            json!({
                "title": "Clip",
                "fileName": "clip.mp4",
                "fileUrl": "https://cdn.example.com/clip.mp4",
                "contentType": "video/mp4",
                "sizeBytes": 10,
                "kind": "video",
                "status": "ready",
            }),
        )
        .await
        .unwrap();
    store
        .insert(
            "media",
            json!({
                "title": "Cover",
                "fileName": "cover.png",
                "fileUrl": "https://cdn.example.com/cover.png",
                "contentType": "image/png",
                "sizeBytes": 5,
                "kind": "image",
                "status": "ready",
            }),
        )
        .await
        .unwrap();

    let response = app
        .oneshot(request("GET", "/api/media?kind=video", Some(&viewer), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["file_name"], "clip.mp4");
    assert_eq!(data[0]["kind"], "video");
}
