use crate::modules::audit::model::{AuditEntry, AuditFilterParams, COLLECTION};
use crate::state::AppState;
use crate::store::{ListQuery, list_with_fallback};
use crate::utils::datetime::parse_date_param;
use crate::utils::errors::AppError;
use crate::utils::pagination::PageMeta;

pub struct AuditService;

impl AuditService {
    pub async fn list(
        state: &AppState,
        params: &AuditFilterParams,
    ) -> Result<(Vec<AuditEntry>, PageMeta), AppError> {
        let limit = params.page.limit();
        let mut query = ListQuery::new(limit).start_after(params.page.start_after.clone());

        if let Some(resource_type) = &params.resource_type {
            query = query.filter("resource_type", resource_type);
        }
        if let Some(action) = &params.action {
            query = query.filter("action", action);
        }
        if let Some(actor_id) = &params.actor_id {
            query = query.filter("actor_id", actor_id);
        }
        if let Some(start) = &params.start_date {
            query = query.created_after(parse_date_param(start, false)?);
        }
        if let Some(end) = &params.end_date {
            query = query.created_before(parse_date_param(end, true)?);
        }

        let page = list_with_fallback(state.store.as_ref(), COLLECTION, query).await?;
        let entries = page
            .documents
            .into_iter()
            .map(AuditEntry::from_doc)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((
            entries,
            PageMeta {
                limit,
                has_more: page.has_more,
                next_cursor: page.next_cursor,
            },
        ))
    }

    pub async fn get(state: &AppState, id: &str) -> Result<AuditEntry, AppError> {
        let doc = state
            .store
            .get(COLLECTION, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Audit entry {} not found", id)))?;
        AuditEntry::from_doc(doc)
    }
}
