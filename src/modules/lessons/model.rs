//! Lesson models.
//!
//! The `lessons` collection persists snake_case fields. Documents written by
//! older importers used camelCase keys (`videoUrl`, `programId`), so the
//! stored shape accepts both via serde aliases; the API surface is snake_case
//! only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;
use validator::Validate;

use crate::store::Document;
use crate::utils::errors::AppError;
use crate::utils::pagination::{PageMeta, PageParams};

pub const COLLECTION: &str = "lessons";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LessonStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl LessonStatus {
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
struct LessonDoc {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(alias = "programId")]
    program_id: String,
    #[serde(default)]
    status: LessonStatus,
    #[serde(default, alias = "videoUrl")]
    video_url: Option<String>,
    #[serde(default, alias = "durationSeconds")]
    duration_seconds: Option<i64>,
    #[serde(default)]
    position: i64,
}

/// A lesson inside a program.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub description: String,
    pub program_id: String,
    pub status: LessonStatus,
    pub video_url: Option<String>,
    pub duration_seconds: Option<i64>,
    pub position: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lesson {
    pub fn from_doc(doc: Document) -> Result<Self, AppError> {
        let id = doc.id;
        let parsed: LessonDoc = serde_json::from_value(doc.data).map_err(|e| {
            AppError::internal(anyhow::anyhow!("malformed lesson document {}: {}", id, e))
        })?;
        Ok(Self {
            id,
            title: parsed.title,
            description: parsed.description,
            program_id: parsed.program_id,
            status: parsed.status,
            video_url: parsed.video_url,
            duration_seconds: parsed.duration_seconds,
            position: parsed.position,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateLessonDto {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, message = "program_id must not be empty"))]
    pub program_id: String,
    #[serde(default)]
    pub status: LessonStatus,
    #[validate(url(message = "video_url must be a valid URL"))]
    pub video_url: Option<String>,
    #[validate(range(min = 0, message = "duration_seconds must not be negative"))]
    pub duration_seconds: Option<i64>,
    #[serde(default)]
    #[validate(range(min = 0, message = "position must not be negative"))]
    pub position: i64,
}

impl CreateLessonDto {
    pub fn to_doc(&self) -> Value {
        json!({
            "title": self.title,
            "description": self.description,
            "program_id": self.program_id,
            "status": self.status,
            "video_url": self.video_url,
            "duration_seconds": self.duration_seconds,
            "position": self.position,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateLessonDto {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "program_id must not be empty"))]
    pub program_id: Option<String>,
    pub status: Option<LessonStatus>,
    #[validate(url(message = "video_url must be a valid URL"))]
    pub video_url: Option<String>,
    #[validate(range(min = 0, message = "duration_seconds must not be negative"))]
    pub duration_seconds: Option<i64>,
    #[validate(range(min = 0, message = "position must not be negative"))]
    pub position: Option<i64>,
}

impl UpdateLessonDto {
    pub fn to_patch(&self) -> Value {
        let mut patch = serde_json::Map::new();
        if let Some(title) = &self.title {
            patch.insert("title".to_string(), json!(title));
        }
        if let Some(description) = &self.description {
            patch.insert("description".to_string(), json!(description));
        }
        if let Some(program_id) = &self.program_id {
            patch.insert("program_id".to_string(), json!(program_id));
        }
        if let Some(status) = self.status {
            patch.insert("status".to_string(), json!(status));
        }
        if let Some(video_url) = &self.video_url {
            patch.insert("video_url".to_string(), json!(video_url));
        }
        if let Some(duration) = self.duration_seconds {
            patch.insert("duration_seconds".to_string(), json!(duration));
        }
        if let Some(position) = self.position {
            patch.insert("position".to_string(), json!(position));
        }
        Value::Object(patch)
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LessonFilterParams {
    pub program_id: Option<String>,
    pub status: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LessonResponse {
    pub success: bool,
    pub lesson: Lesson,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LessonListResponse {
    pub success: bool,
    pub data: Vec<Lesson>,
    pub meta: PageMeta,
}
