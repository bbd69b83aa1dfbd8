//! Program models.
//!
//! The `programs` collection persists snake_case fields; the stored and
//! canonical shapes coincide apart from the id and timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;
use validator::Validate;

use crate::store::Document;
use crate::utils::errors::AppError;
use crate::utils::pagination::{PageMeta, PageParams};

pub const COLLECTION: &str = "programs";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProgramStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl ProgramStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "archived" => Ok(Self::Archived),
            other => Err(AppError::validation(format!("Invalid status: {}", other))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ProgramDoc {
    title: String,
    description: String,
    #[serde(default)]
    status: ProgramStatus,
}

/// A learning program (a collection of lessons).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Program {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: ProgramStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Program {
    pub fn from_doc(doc: Document) -> Result<Self, AppError> {
        let id = doc.id;
        let parsed: ProgramDoc = serde_json::from_value(doc.data).map_err(|e| {
            AppError::internal(anyhow::anyhow!("malformed program document {}: {}", id, e))
        })?;
        Ok(Self {
            id,
            title: parsed.title,
            description: parsed.description,
            status: parsed.status,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProgramDto {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    #[serde(default)]
    pub status: ProgramStatus,
}

impl CreateProgramDto {
    pub fn to_doc(&self) -> Value {
        json!({
            "title": self.title,
            "description": self.description,
            "status": self.status,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProgramDto {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: Option<String>,
    pub status: Option<ProgramStatus>,
}

impl UpdateProgramDto {
    pub fn to_patch(&self) -> Value {
        let mut patch = serde_json::Map::new();
        if let Some(title) = &self.title {
            patch.insert("title".to_string(), json!(title));
        }
        if let Some(description) = &self.description {
            patch.insert("description".to_string(), json!(description));
        }
        if let Some(status) = self.status {
            patch.insert("status".to_string(), json!(status));
        }
        Value::Object(patch)
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProgramFilterParams {
    pub status: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProgramResponse {
    pub success: bool,
    pub program: Program,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProgramListResponse {
    pub success: bool,
    pub data: Vec<Program>,
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(ProgramStatus::parse("draft").unwrap(), ProgramStatus::Draft);
        assert!(ProgramStatus::parse("live").is_err());
    }

    #[test]
    fn test_from_doc_defaults_missing_status() {
        let now = Utc::now();
        let doc = Document {
            id: "p1".to_string(),
            data: json!({"title": "T", "description": "D"}),
            created_at: now,
            updated_at: now,
        };
        let program = Program::from_doc(doc).unwrap();
        assert_eq!(program.status, ProgramStatus::Draft);
    }

    #[test]
    fn test_from_doc_rejects_malformed_document() {
        let now = Utc::now();
        let doc = Document {
            id: "p1".to_string(),
            data: json!({"name": "wrong shape"}),
            created_at: now,
            updated_at: now,
        };
        assert!(Program::from_doc(doc).is_err());
    }

    #[test]
    fn test_update_patch_empty_when_no_fields() {
        let dto = UpdateProgramDto {
            title: None,
            description: None,
            status: None,
        };
        assert_eq!(dto.to_patch(), json!({}));
    }
}
