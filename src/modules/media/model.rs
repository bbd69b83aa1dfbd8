//! Media asset models.
//!
//! The `media` collection persists camelCase fields (the shape the upload
//! pipeline writes); [`MediaAsset`] is the canonical snake_case API view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;
use validator::Validate;

use crate::store::Document;
use crate::utils::errors::AppError;
use crate::utils::pagination::{PageMeta, PageParams};

pub const COLLECTION: &str = "media";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
    Image,
    Document,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Image => "image",
            Self::Document => "document",
        }
    }

    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "video" => Ok(Self::Video),
            "audio" => Ok(Self::Audio),
            "image" => Ok(Self::Image),
            "document" => Ok(Self::Document),
            other => Err(AppError::validation(format!("Invalid kind: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaStatus {
    #[default]
    Pending,
    Ready,
    Archived,
}

impl MediaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Ready => "ready",
            Self::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "pending" => Ok(Self::Pending),
            "ready" => Ok(Self::Ready),
            "archived" => Ok(Self::Archived),
            other => Err(AppError::validation(format!("Invalid status: {}", other))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MediaDoc {
    title: String,
    file_name: String,
    file_url: String,
    content_type: String,
    #[serde(default)]
    size_bytes: i64,
    kind: MediaKind,
    #[serde(default)]
    status: MediaStatus,
}

/// An uploaded media asset.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MediaAsset {
    pub id: String,
    pub title: String,
    pub file_name: String,
    pub file_url: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub kind: MediaKind,
    pub status: MediaStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MediaAsset {
    pub fn from_doc(doc: Document) -> Result<Self, AppError> {
        let id = doc.id;
        let parsed: MediaDoc = serde_json::from_value(doc.data).map_err(|e| {
            AppError::internal(anyhow::anyhow!("malformed media document {}: {}", id, e))
        })?;
        Ok(Self {
            id,
            title: parsed.title,
            file_name: parsed.file_name,
            file_url: parsed.file_url,
            content_type: parsed.content_type,
            size_bytes: parsed.size_bytes,
            kind: parsed.kind,
            status: parsed.status,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateMediaDto {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "file_name must not be empty"))]
    pub file_name: String,
    #[validate(url(message = "file_url must be a valid URL"))]
    pub file_url: String,
    #[validate(length(min = 1, message = "content_type must not be empty"))]
    pub content_type: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "size_bytes must not be negative"))]
    pub size_bytes: i64,
    pub kind: MediaKind,
    #[serde(default)]
    pub status: MediaStatus,
}

impl CreateMediaDto {
    pub fn to_doc(&self) -> Value {
        json!({
            "title": self.title,
            "fileName": self.file_name,
            "fileUrl": self.file_url,
            "contentType": self.content_type,
            "sizeBytes": self.size_bytes,
            "kind": self.kind,
            "status": self.status,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateMediaDto {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    pub status: Option<MediaStatus>,
}

impl UpdateMediaDto {
    pub fn to_patch(&self) -> Value {
        let mut patch = serde_json::Map::new();
        if let Some(title) = &self.title {
            patch.insert("title".to_string(), json!(title));
        }
        if let Some(status) = self.status {
            patch.insert("status".to_string(), json!(status));
        }
        Value::Object(patch)
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MediaFilterParams {
    pub kind: Option<String>,
    pub status: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MediaResponse {
    pub success: bool,
    pub media: MediaAsset,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MediaListResponse {
    pub success: bool,
    pub data: Vec<MediaAsset>,
    pub meta: PageMeta,
}
