use crate::middleware::auth::AuthUser;
use crate::modules::audit::model::{AuditEvent, RequestContext};
use crate::modules::programs::model::{
    COLLECTION, CreateProgramDto, Program, ProgramFilterParams, ProgramStatus, UpdateProgramDto,
};
use crate::state::AppState;
use crate::store::{ListQuery, list_with_fallback};
use crate::utils::errors::AppError;
use crate::utils::pagination::PageMeta;

pub struct ProgramService;

impl ProgramService {
    pub async fn list(
        state: &AppState,
        params: &ProgramFilterParams,
    ) -> Result<(Vec<Program>, PageMeta), AppError> {
        let limit = params.page.limit();
        let mut query = ListQuery::new(limit).start_after(params.page.start_after.clone());
        if let Some(status) = &params.status {
            query = query.filter("status", ProgramStatus::parse(status)?.as_str());
        }

        let page = list_with_fallback(state.store.as_ref(), COLLECTION, query).await?;
        let programs = page
            .documents
            .into_iter()
            .map(Program::from_doc)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((
            programs,
            PageMeta {
                limit,
                has_more: page.has_more,
                next_cursor: page.next_cursor,
            },
        ))
    }

    pub async fn get(state: &AppState, id: &str) -> Result<Program, AppError> {
        let doc = state
            .store
            .get(COLLECTION, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Program {} not found", id)))?;
        Program::from_doc(doc)
    }

    pub async fn create(
        state: &AppState,
        actor: &AuthUser,
        ctx: &RequestContext,
        dto: CreateProgramDto,
    ) -> Result<Program, AppError> {
        let doc = state.store.insert(COLLECTION, dto.to_doc()).await?;
        let program = Program::from_doc(doc)?;

        state.audit.record_background(
            AuditEvent::new("program.created", "program", &program.id, actor)
                .with_after(serde_json::to_value(&program)?)
                .with_context(ctx),
        );
        Ok(program)
    }

    pub async fn update(
        state: &AppState,
        actor: &AuthUser,
        ctx: &RequestContext,
        id: &str,
        dto: UpdateProgramDto,
    ) -> Result<Program, AppError> {
        let patch = dto.to_patch();
        if patch.as_object().is_some_and(|p| p.is_empty()) {
            return Err(AppError::validation("No fields to update"));
        }

        let before = Self::get(state, id).await?;
        let doc = state
            .store
            .update(COLLECTION, id, patch)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Program {} not found", id)))?;
        let program = Program::from_doc(doc)?;

        state.audit.record_background(
            AuditEvent::new("program.updated", "program", id, actor)
                .with_before(serde_json::to_value(&before)?)
                .with_after(serde_json::to_value(&program)?)
                .with_context(ctx),
        );
        Ok(program)
    }

    pub async fn delete(
        state: &AppState,
        actor: &AuthUser,
        ctx: &RequestContext,
        id: &str,
    ) -> Result<(), AppError> {
        let before = Self::get(state, id).await?;
        state.store.delete(COLLECTION, id).await?;

        // Deletions are security-sensitive: the entry is awaited.
        state
            .audit
            .record(
                AuditEvent::new("program.deleted", "program", id, actor)
                    .with_before(serde_json::to_value(&before)?)
                    .with_context(ctx),
            )
            .await?;
        Ok(())
    }
}
