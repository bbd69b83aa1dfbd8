use crate::middleware::auth::AuthUser;
use crate::modules::audit::model::{AuditEvent, RequestContext};
use crate::modules::onboarding::model::{
    COLLECTION, CreateSurveyDto, Question, QuestionKind, Survey, SurveyFilterParams, SurveyStatus,
    UpdateSurveyDto,
};
use crate::state::AppState;
use crate::store::{ListQuery, list_with_fallback};
use crate::utils::errors::AppError;
use crate::utils::pagination::PageMeta;

pub struct OnboardingService;

impl OnboardingService {
    pub async fn list(
        state: &AppState,
        params: &SurveyFilterParams,
    ) -> Result<(Vec<Survey>, PageMeta), AppError> {
        let limit = params.page.limit();
        let mut query = ListQuery::new(limit).start_after(params.page.start_after.clone());
        if let Some(status) = &params.status {
            query = query.filter("status", SurveyStatus::parse(status)?.as_str());
        }

        let page = list_with_fallback(state.store.as_ref(), COLLECTION, query).await?;
        let surveys = page
            .documents
            .into_iter()
            .map(Survey::from_doc)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((
            surveys,
            PageMeta {
                limit,
                has_more: page.has_more,
                next_cursor: page.next_cursor,
            },
        ))
    }

    pub async fn get(state: &AppState, id: &str) -> Result<Survey, AppError> {
        let doc = state
            .store
            .get(COLLECTION, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Survey {} not found", id)))?;
        Survey::from_doc(doc)
    }

    pub async fn create(
        state: &AppState,
        actor: &AuthUser,
        ctx: &RequestContext,
        dto: CreateSurveyDto,
    ) -> Result<Survey, AppError> {
        validate_questions(&dto.questions)?;

        let doc = state.store.insert(COLLECTION, dto.to_doc()).await?;
        let survey = Survey::from_doc(doc)?;

        state.audit.record_background(
            AuditEvent::new("onboarding.created", "onboarding_config", &survey.id, actor)
                .with_after(serde_json::to_value(&survey)?)
                .with_context(ctx),
        );
        Ok(survey)
    }

    pub async fn update(
        state: &AppState,
        actor: &AuthUser,
        ctx: &RequestContext,
        id: &str,
        dto: UpdateSurveyDto,
    ) -> Result<Survey, AppError> {
        let patch = dto.to_patch();
        if patch.as_object().is_some_and(|p| p.is_empty()) {
            return Err(AppError::validation("No fields to update"));
        }
        if let Some(questions) = &dto.questions {
            validate_questions(questions)?;
        }

        let before = Self::get(state, id).await?;
        let doc = state
            .store
            .update(COLLECTION, id, patch)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Survey {} not found", id)))?;
        let survey = Survey::from_doc(doc)?;

        state.audit.record_background(
            AuditEvent::new("onboarding.updated", "onboarding_config", id, actor)
                .with_before(serde_json::to_value(&before)?)
                .with_after(serde_json::to_value(&survey)?)
                .with_context(ctx),
        );
        Ok(survey)
    }

    pub async fn delete(
        state: &AppState,
        actor: &AuthUser,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<(), AppError> {
        let before = Self::get(state, id).await?;
        state.store.delete(COLLECTION, id).await?;

        state
            .audit
            .record(
                AuditEvent::new("onboarding.deleted", "onboarding_config", id, actor)
                    .with_before(serde_json::to_value(&before)?)
                    .with_context(ctx),
            )
            .await?;
        Ok(())
    }
}

/// Structural rules the derive-level validators cannot express: choice
/// questions need options, scalar questions must not carry any.
fn validate_questions(questions: &[Question]) -> Result<(), AppError> {
    for (idx, question) in questions.iter().enumerate() {
        if question.prompt.trim().is_empty() {
            return Err(AppError::validation(format!(
                "Question {} has an empty prompt",
                idx
            )));
        }
        match question.kind {
            QuestionKind::MultipleChoice => {
                if question.options.is_empty() {
                    return Err(AppError::validation(format!(
                        "Question {} is multiple_choice but has no options",
                        idx
                    )));
                }
            }
            QuestionKind::Slider | QuestionKind::Text => {
                if !question.options.is_empty() {
                    return Err(AppError::validation(format!(
                        "Question {} must not have options",
                        idx
                    )));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(kind: QuestionKind, options: &[&str]) -> Question {
        Question {
            prompt: "How are you?".to_string(),
            kind,
            options: options.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_multiple_choice_requires_options() {
        assert!(validate_questions(&[question(QuestionKind::MultipleChoice, &[])]).is_err());
        assert!(validate_questions(&[question(QuestionKind::MultipleChoice, &["a"])]).is_ok());
    }

    #[test]
    fn test_scalar_kinds_reject_options() {
        assert!(validate_questions(&[question(QuestionKind::Slider, &["a"])]).is_err());
        assert!(validate_questions(&[question(QuestionKind::Text, &[])]).is_ok());
    }

    #[test]
    fn test_blank_prompt_rejected() {
        let q = Question {
            prompt: "   ".to_string(),
            kind: QuestionKind::Text,
            options: vec![],
        };
        assert!(validate_questions(&[q]).is_err());
    }
}
