use crate::middleware::auth::AuthUser;
use crate::modules::audit::model::{AuditEvent, RequestContext};
use crate::modules::commands::model::{
    COLLECTION, Command, CommandFilterParams, CommandStatus, CreateCommandDto,
};
use crate::state::AppState;
use crate::store::{ListQuery, list_with_fallback};
use crate::utils::datetime::parse_date_param;
use crate::utils::errors::AppError;
use crate::utils::pagination::PageMeta;

pub struct CommandService;

impl CommandService {
    pub async fn list(
        state: &AppState,
        params: &CommandFilterParams,
    ) -> Result<(Vec<Command>, PageMeta), AppError> {
        let limit = params.page.limit();
        let mut query = ListQuery::new(limit).start_after(params.page.start_after.clone());
        if let Some(action) = &params.action {
            query = query.filter("action", action);
        }
        if let Some(status) = &params.status {
            query = query.filter("status", CommandStatus::parse(status)?.as_str());
        }
        if let Some(issued_by) = &params.issued_by {
            query = query.filter("issued_by", issued_by);
        }
        if let Some(start) = &params.start_date {
            query = query.created_after(parse_date_param(start, false)?);
        }
        if let Some(end) = &params.end_date {
            query = query.created_before(parse_date_param(end, true)?);
        }

        let page = list_with_fallback(state.store.as_ref(), COLLECTION, query).await?;
        let commands = page
            .documents
            .into_iter()
            .map(Command::from_doc)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((
            commands,
            PageMeta {
                limit,
                has_more: page.has_more,
                next_cursor: page.next_cursor,
            },
        ))
    }

    pub async fn get(state: &AppState, id: &str) -> Result<Command, AppError> {
        let doc = state
            .store
            .get(COLLECTION, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Command {} not found", id)))?;
        Command::from_doc(doc)
    }

    pub async fn create(
        state: &AppState,
        actor: &AuthUser,
        ctx: &RequestContext,
        dto: CreateCommandDto,
    ) -> Result<Command, AppError> {
        let doc = state
            .store
            .insert(COLLECTION, dto.to_doc(actor.user_id()))
            .await?;
        let command = Command::from_doc(doc)?;

        state.audit.record_background(
            AuditEvent::new("command.issued", "command", &command.id, actor)
                .with_after(serde_json::to_value(&command)?)
                .with_context(ctx),
        );
        Ok(command)
    }
}
