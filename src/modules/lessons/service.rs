use crate::middleware::auth::AuthUser;
use crate::modules::audit::model::{AuditEvent, RequestContext};
use crate::modules::lessons::model::{
    COLLECTION, CreateLessonDto, Lesson, LessonFilterParams, LessonStatus, UpdateLessonDto,
};
use crate::modules::programs;
use crate::state::AppState;
use crate::store::{ListQuery, list_with_fallback};
use crate::utils::errors::AppError;
use crate::utils::pagination::PageMeta;

pub struct LessonService;

impl LessonService {
    /// Lessons list in their in-program order by default.
    pub async fn list(
        state: &AppState,
        params: &LessonFilterParams,
    ) -> Result<(Vec<Lesson>, PageMeta), AppError> {
        let limit = params.page.limit();
        let mut query = ListQuery::new(limit)
            .order_by("position")
            .start_after(params.page.start_after.clone());
        if let Some(program_id) = &params.program_id {
            query = query.filter("program_id", program_id);
        }
        if let Some(status) = &params.status {
            query = query.filter("status", LessonStatus::parse(status)?.as_str());
        }

        let page = list_with_fallback(state.store.as_ref(), COLLECTION, query).await?;
        let lessons = page
            .documents
            .into_iter()
            .map(Lesson::from_doc)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((
            lessons,
            PageMeta {
                limit,
                has_more: page.has_more,
                next_cursor: page.next_cursor,
            },
        ))
    }

    pub async fn get(state: &AppState, id: &str) -> Result<Lesson, AppError> {
        let doc = state
            .store
            .get(COLLECTION, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Lesson {} not found", id)))?;
        Lesson::from_doc(doc)
    }

    pub async fn create(
        state: &AppState,
        actor: &AuthUser,
        ctx: &RequestContext,
        dto: CreateLessonDto,
    ) -> Result<Lesson, AppError> {
        Self::ensure_program_exists(state, &dto.program_id).await?;

        let doc = state.store.insert(COLLECTION, dto.to_doc()).await?;
        let lesson = Lesson::from_doc(doc)?;

        state.audit.record_background(
            AuditEvent::new("lesson.created", "lesson", &lesson.id, actor)
                .with_after(serde_json::to_value(&lesson)?)
                .with_context(ctx),
        );
        Ok(lesson)
    }

    pub async fn update(
        state: &AppState,
        actor: &AuthUser,
        ctx: &RequestContext,
        id: &str,
        dto: UpdateLessonDto,
    ) -> Result<Lesson, AppError> {
        let patch = dto.to_patch();
        if patch.as_object().is_some_and(|p| p.is_empty()) {
            return Err(AppError::validation("No fields to update"));
        }
        if let Some(program_id) = &dto.program_id {
            Self::ensure_program_exists(state, program_id).await?;
        }

        let before = Self::get(state, id).await?;
        let doc = state
            .store
            .update(COLLECTION, id, patch)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Lesson {} not found", id)))?;
        let lesson = Lesson::from_doc(doc)?;

        state.audit.record_background(
            AuditEvent::new("lesson.updated", "lesson", id, actor)
                .with_before(serde_json::to_value(&before)?)
                .with_after(serde_json::to_value(&lesson)?)
                .with_context(ctx),
        );
        Ok(lesson)
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
                AuditEvent::new("lesson.deleted", "lesson", id, actor)
                    .with_before(serde_json::to_value(&before)?)
                    .with_context(ctx),
            )
            .await?;
        Ok(())
    }

    async fn ensure_program_exists(state: &AppState, program_id: &str) -> Result<(), AppError> {
        let exists = state
            .store
            .get(programs::model::COLLECTION, program_id)
            .await?
            .is_some();
        if !exists {
            return Err(AppError::validation(format!(
                "Unknown program: {}",
                program_id
            )));
        }
        Ok(())
    }
}
