//! Audit log models.
//!
//! Audit entries are append-only: this system only ever inserts them, never
//! updates or deletes.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::convert::Infallible;
use utoipa::ToSchema;

use crate::middleware::auth::AuthUser;
use crate::store::Document;
use crate::utils::errors::AppError;
use crate::utils::pagination::{PageMeta, PageParams};

pub const COLLECTION: &str = "audit_logs";

/// Description of a mutating action, as handed to the audit logger.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditEvent {
    /// Dot-namespaced verb, e.g. `lesson.created`.
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub actor_id: String,
    pub actor_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl AuditEvent {
    pub fn new(
        action: impl Into<String>,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        actor: &AuthUser,
    ) -> Self {
        Self {
            action: action.into(),
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            actor_id: actor.user_id().to_string(),
            actor_email: actor.email().to_string(),
            before: None,
            after: None,
            ip: None,
            user_agent: None,
        }
    }

    pub fn with_before(mut self, before: Value) -> Self {
        self.before = Some(before);
        self
    }

    pub fn with_after(mut self, after: Value) -> Self {
        self.after = Some(after);
        self
    }

    pub fn with_context(mut self, ctx: &RequestContext) -> Self {
        self.ip = ctx.ip.clone();
        self.user_agent = ctx.user_agent.clone();
        self
    }
}

/// A persisted audit entry.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuditEntry {
    pub id: String,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub actor_id: String,
    pub actor_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn from_doc(doc: Document) -> Result<Self, AppError> {
        let id = doc.id;
        let event: AuditEvent = serde_json::from_value(doc.data).map_err(|e| {
            AppError::internal(anyhow::anyhow!("malformed audit entry {}: {}", id, e))
        })?;
        Ok(Self {
            id,
            action: event.action,
            resource_type: event.resource_type,
            resource_id: event.resource_id,
            actor_id: event.actor_id,
            actor_email: event.actor_email,
            before: event.before,
            after: event.after,
            ip: event.ip,
            user_agent: event.user_agent,
            created_at: doc.created_at,
        })
    }
}

/// Optional request context attached to audit entries.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(|value| value.trim().to_string());

        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        Ok(Self { ip, user_agent })
    }
}

/// Query parameters for filtering audit entries.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AuditFilterParams {
    pub resource_type: Option<String>,
    pub action: Option<String>,
    pub actor_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuditListResponse {
    pub success: bool,
    pub data: Vec<AuditEntry>,
    pub meta: PageMeta,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuditEntryResponse {
    pub success: bool,
    pub entry: AuditEntry,
}
