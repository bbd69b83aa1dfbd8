use crate::middleware::auth::AuthUser;
use crate::modules::audit::model::{AuditEvent, RequestContext};
use crate::modules::users::model::{
    COLLECTION, CreateUserDto, SetRoleDto, UpdateUserDto, User, UserFilterParams, UserRole,
};
use crate::state::AppState;
use crate::store::{ListQuery, list_with_fallback};
use crate::utils::errors::AppError;
use crate::utils::pagination::PageMeta;

pub struct UserService;

impl UserService {
    pub async fn list(
        state: &AppState,
        params: &UserFilterParams,
    ) -> Result<(Vec<User>, PageMeta), AppError> {
        let limit = params.page.limit();
        let mut query = ListQuery::new(limit).start_after(params.page.start_after.clone());
        if let Some(role) = &params.role {
            query = query.filter("role", UserRole::parse(role)?.as_str());
        }
        if let Some(email) = &params.email {
            query = query.filter("email", email);
        }

        let page = list_with_fallback(state.store.as_ref(), COLLECTION, query).await?;
        let users = page
            .documents
            .into_iter()
            .map(User::from_doc)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((
            users,
            PageMeta {
                limit,
                has_more: page.has_more,
                next_cursor: page.next_cursor,
            },
        ))
    }

    pub async fn get(state: &AppState, id: &str) -> Result<User, AppError> {
        let doc = state
            .store
            .get(COLLECTION, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {} not found", id)))?;
        User::from_doc(doc)
    }

    pub async fn create(
        state: &AppState,
        actor: &AuthUser,
        ctx: &RequestContext,
        dto: CreateUserDto,
    ) -> Result<User, AppError> {
        let doc = state.store.insert(COLLECTION, dto.to_doc()).await?;
        let user = User::from_doc(doc)?;

        state.audit.record_background(
            AuditEvent::new("user.created", "user", &user.id, actor)
                .with_after(serde_json::to_value(&user)?)
                .with_context(ctx),
        );
        Ok(user)
    }

    pub async fn update(
        state: &AppState,
        actor: &AuthUser,
        ctx: &RequestContext,
        id: &str,
        dto: UpdateUserDto,
    ) -> Result<User, AppError> {
        let patch = dto.to_patch();
        if patch.as_object().is_some_and(|p| p.is_empty()) {
            return Err(AppError::validation("No fields to update"));
        }

        let before = Self::get(state, id).await?;
        let doc = state
            .store
            .update(COLLECTION, id, patch)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {} not found", id)))?;
        let user = User::from_doc(doc)?;

        state.audit.record_background(
            AuditEvent::new("user.updated", "user", id, actor)
                .with_before(serde_json::to_value(&before)?)
                .with_after(serde_json::to_value(&user)?)
                .with_context(ctx),
        );
        Ok(user)
    }

    /// Role changes are privilege transitions: the audit write is awaited, an
    /// admin may not demote their own account, and an unknown target produces
    /// a 404 without touching the audit log.
    pub async fn set_role(
        state: &AppState,
        actor: &AuthUser,
        ctx: &RequestContext,
        id: &str,
        dto: SetRoleDto,
    ) -> Result<User, AppError> {
        if id == actor.user_id() && dto.role != UserRole::Admin {
            return Err(AppError::forbidden(
                "Admins cannot change their own role away from admin",
            ));
        }

        let before = Self::get(state, id).await?;
        let doc = state
            .store
            .update(COLLECTION, id, serde_json::json!({"role": dto.role}))
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {} not found", id)))?;
        let user = User::from_doc(doc)?;

        state
            .audit
            .record(
                AuditEvent::new("user.role_changed", "user", id, actor)
                    .with_before(serde_json::to_value(&before)?)
                    .with_after(serde_json::to_value(&user)?)
                    .with_context(ctx),
            )
            .await?;
        Ok(user)
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
                AuditEvent::new("user.deleted", "user", id, actor)
                    .with_before(serde_json::to_value(&before)?)
                    .with_context(ctx),
            )
            .await?;
        Ok(())
    }
}
