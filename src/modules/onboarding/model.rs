//! Onboarding survey models.
//!
//! The `onboarding_configs` collection persists camelCase fields. A config is
//! a named set of questions shown to new app users; only one config is
//! expected to be `active` at a time, but that is an operational convention
//! rather than an enforced invariant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;
use validator::Validate;

use crate::store::Document;
use crate::utils::errors::AppError;
use crate::utils::pagination::{PageMeta, PageParams};

pub const COLLECTION: &str = "onboarding_configs";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SurveyStatus {
    #[default]
    Draft,
    Active,
    Archived,
}

impl SurveyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "archived" => Ok(Self::Archived),
            other => Err(AppError::validation(format!("Invalid status: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    Slider,
    Text,
}

/// A survey question as stored (camelCase keys) and as served (snake_case).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Question {
    pub prompt: String,
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionDoc {
    prompt: String,
    kind: QuestionKind,
    #[serde(default)]
    options: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SurveyDoc {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    status: SurveyStatus,
    #[serde(default)]
    questions: Vec<QuestionDoc>,
}

/// An onboarding survey configuration.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Survey {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: SurveyStatus,
    pub questions: Vec<Question>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Survey {
    pub fn from_doc(doc: Document) -> Result<Self, AppError> {
        let id = doc.id;
        let parsed: SurveyDoc = serde_json::from_value(doc.data).map_err(|e| {
            AppError::internal(anyhow::anyhow!(
                "malformed onboarding document {}: {}",
                id,
                e
            ))
        })?;
        Ok(Self {
            id,
            title: parsed.title,
            description: parsed.description,
            status: parsed.status,
            questions: parsed
                .questions
                .into_iter()
                .map(|q| Question {
                    prompt: q.prompt,
                    kind: q.kind,
                    options: q.options,
                })
                .collect(),
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }
}

fn questions_to_doc(questions: &[Question]) -> Value {
    Value::Array(
        questions
            .iter()
            .map(|q| {
                json!({
                    "prompt": q.prompt,
                    "kind": q.kind,
                    "options": q.options,
                })
            })
            .collect(),
    )
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSurveyDto {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: SurveyStatus,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl CreateSurveyDto {
    pub fn to_doc(&self) -> Value {
        json!({
            "title": self.title,
            "description": self.description,
            "status": self.status,
            "questions": questions_to_doc(&self.questions),
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateSurveyDto {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<SurveyStatus>,
    pub questions: Option<Vec<Question>>,
}

impl UpdateSurveyDto {
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
        if let Some(questions) = &self.questions {
            patch.insert("questions".to_string(), questions_to_doc(questions));
        }
        Value::Object(patch)
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SurveyFilterParams {
    pub status: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SurveyResponse {
    pub success: bool,
    pub survey: Survey,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SurveyListResponse {
    pub success: bool,
    pub data: Vec<Survey>,
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_doc_reads_camel_case_questions() {
        let now = Utc::now();
        let doc = Document {
            id: "s1".to_string(),
            data: json!({
                "title": "Welcome",
                "status": "active",
                "questions": [
                    {"prompt": "How did you hear about us?", "kind": "multiple_choice", "options": ["friend", "ad"]},
                    {"prompt": "Anything else?", "kind": "text"}
                ]
            }),
            created_at: now,
            updated_at: now,
        };
        let survey = Survey::from_doc(doc).unwrap();
        assert_eq!(survey.status, SurveyStatus::Active);
        assert_eq!(survey.questions.len(), 2);
        assert_eq!(survey.questions[0].kind, QuestionKind::MultipleChoice);
        assert!(survey.questions[1].options.is_empty());
    }

    #[test]
    fn test_question_kind_wire_format() {
        assert_eq!(
            serde_json::to_value(QuestionKind::MultipleChoice).unwrap(),
            json!("multiple_choice")
        );
    }
}
