//! Remote command log models.
//!
//! The `commands` collection is an append-only log of operator-issued
//! commands. Entries are never updated or deleted through the API; delivery
//! status transitions are written by the device gateway out of band.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;
use validator::Validate;

use crate::store::Document;
use crate::utils::errors::AppError;
use crate::utils::pagination::{PageMeta, PageParams};

pub const COLLECTION: &str = "commands";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CommandStatus {
    #[default]
    Pending,
    Sent,
    Completed,
    Failed,
}

impl CommandStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "pending" => Ok(Self::Pending),
            "sent" => Ok(Self::Sent),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(AppError::validation(format!("Invalid status: {}", other))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CommandDoc {
    action: String,
    #[serde(default)]
    payload: Value,
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    status: CommandStatus,
    issued_by: String,
}

/// A logged command.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Command {
    pub id: String,
    pub action: String,
    pub payload: Value,
    pub target: Option<String>,
    pub status: CommandStatus,
    pub issued_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Command {
    pub fn from_doc(doc: Document) -> Result<Self, AppError> {
        let id = doc.id;
        let parsed: CommandDoc = serde_json::from_value(doc.data).map_err(|e| {
            AppError::internal(anyhow::anyhow!("malformed command document {}: {}", id, e))
        })?;
        Ok(Self {
            id,
            action: parsed.action,
            payload: parsed.payload,
            target: parsed.target,
            status: parsed.status,
            issued_by: parsed.issued_by,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCommandDto {
    #[validate(length(min = 1, message = "action must not be empty"))]
    pub action: String,
    #[serde(default)]
    pub payload: Value,
    pub target: Option<String>,
}

impl CreateCommandDto {
    /// The issuer is taken from the authenticated actor, never the body.
    pub fn to_doc(&self, issued_by: &str) -> Value {
        json!({
            "action": self.action,
            "payload": self.payload,
            "target": self.target,
            "status": CommandStatus::Pending,
            "issued_by": issued_by,
        })
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CommandFilterParams {
    pub action: Option<String>,
    pub status: Option<String>,
    pub issued_by: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommandResponse {
    pub success: bool,
    pub command: Command,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommandListResponse {
    pub success: bool,
    pub data: Vec<Command>,
    pub meta: PageMeta,
}
