use crate::middleware::auth::AuthUser;
use crate::modules::audit::model::{AuditEvent, RequestContext};
use crate::modules::media::model::{
    COLLECTION, CreateMediaDto, MediaAsset, MediaFilterParams, MediaKind, MediaStatus,
    UpdateMediaDto,
};
use crate::state::AppState;
use crate::store::{ListQuery, list_with_fallback};
use crate::utils::errors::AppError;
use crate::utils::pagination::PageMeta;

pub struct MediaService;

impl MediaService {
    pub async fn list(
        state: &AppState,
        params: &MediaFilterParams,
    ) -> Result<(Vec<MediaAsset>, PageMeta), AppError> {
        let limit = params.page.limit();
        let mut query = ListQuery::new(limit).start_after(params.page.start_after.clone());
        if let Some(kind) = &params.kind {
            query = query.filter("kind", MediaKind::parse(kind)?.as_str());
        }
        if let Some(status) = &params.status {
            query = query.filter("status", MediaStatus::parse(status)?.as_str());
        }

        let page = list_with_fallback(state.store.as_ref(), COLLECTION, query).await?;
        let assets = page
            .documents
            .into_iter()
            .map(MediaAsset::from_doc)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((
            assets,
            PageMeta {
                limit,
                has_more: page.has_more,
                next_cursor: page.next_cursor,
            },
        ))
    }

    pub async fn get(state: &AppState, id: &str) -> Result<MediaAsset, AppError> {
        let doc = state
            .store
            .get(COLLECTION, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Media {} not found", id)))?;
        MediaAsset::from_doc(doc)
    }

    pub async fn create(
        state: &AppState,
        actor: &AuthUser,
        ctx: &RequestContext,
        dto: CreateMediaDto,
    ) -> Result<MediaAsset, AppError> {
        let doc = state.store.insert(COLLECTION, dto.to_doc()).await?;
        let asset = MediaAsset::from_doc(doc)?;

        state.audit.record_background(
            AuditEvent::new("media.created", "media", &asset.id, actor)
                .with_after(serde_json::to_value(&asset)?)
                .with_context(ctx),
        );
        Ok(asset)
    }

    pub async fn update(
        state: &AppState,
        actor: &AuthUser,
        ctx: &RequestContext,
        id: &str,
        dto: UpdateMediaDto,
    ) -> Result<MediaAsset, AppError> {
        let patch = dto.to_patch();
        if patch.as_object().is_some_and(|p| p.is_empty()) {
            return Err(AppError::validation("No fields to update"));
        }

        let before = Self::get(state, id).await?;
        let doc = state
            .store
            .update(COLLECTION, id, patch)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Media {} not found", id)))?;
        let asset = MediaAsset::from_doc(doc)?;

        state.audit.record_background(
            AuditEvent::new("media.updated", "media", id, actor)
                .with_before(serde_json::to_value(&before)?)
                .with_after(serde_json::to_value(&asset)?)
                .with_context(ctx),
        );
        Ok(asset)
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
                AuditEvent::new("media.deleted", "media", id, actor)
                    .with_before(serde_json::to_value(&before)?)
                    .with_context(ctx),
            )
            .await?;
        Ok(())
    }
}
