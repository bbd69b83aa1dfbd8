//! Role-based authorization extractors.
//!
//! Handlers receive their identity through one of these extractors, so the
//! role check always runs before any data access. Each extractor wraps the
//! authenticated [`AuthUser`] so handlers keep the actor for audit events.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::middleware::auth::AuthUser;
use crate::modules::users::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Checks the caller's role against an allow-list.
pub fn check_any_role(auth_user: &AuthUser, allowed_roles: &[UserRole]) -> Result<(), AppError> {
    let role = auth_user.role();
    if !allowed_roles.contains(&role) {
        return Err(AppError::forbidden(format!(
            "Access denied. Required roles: {:?}, but user has role: {:?}",
            allowed_roles, role
        )));
    }
    Ok(())
}

/// Checks the caller has at least the given privilege level.
pub fn check_min_role(auth_user: &AuthUser, minimum: UserRole) -> Result<(), AppError> {
    let role = auth_user.role();
    if !role.at_least(minimum) {
        return Err(AppError::forbidden(format!(
            "Access denied. Minimum required role: {:?}, but user has role: {:?}",
            minimum, role
        )));
    }
    Ok(())
}

/// Extractor for admin-only operations (deletions, role changes, command
/// issuing, audit reads).
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        check_min_role(&auth_user, UserRole::Admin)?;
        Ok(RequireAdmin(auth_user))
    }
}

/// Extractor for content-editing operations (admin or teacher).
#[derive(Debug, Clone)]
pub struct RequireTeacher(pub AuthUser);

impl FromRequestParts<AppState> for RequireTeacher {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        check_min_role(&auth_user, UserRole::Teacher)?;
        Ok(RequireTeacher(auth_user))
    }
}

/// Extractor for read access to content collections (admin, teacher, or
/// viewer).
#[derive(Debug, Clone)]
pub struct RequireViewer(pub AuthUser);

impl FromRequestParts<AppState> for RequireViewer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        check_min_role(&auth_user, UserRole::Viewer)?;
        Ok(RequireViewer(auth_user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::auth::model::Claims;

    fn auth_user(role: &str) -> AuthUser {
        AuthUser(Claims {
            sub: "uid-1".to_string(),
            email: "test@example.com".to_string(),
            role: role.to_string(),
            exp: 9999999999,
            iat: 1234567890,
        })
    }

    #[test]
    fn test_check_any_role() {
        let teacher = auth_user("teacher");
        assert!(check_any_role(&teacher, &[UserRole::Admin, UserRole::Teacher]).is_ok());
        assert!(check_any_role(&teacher, &[UserRole::Admin]).is_err());
    }

    #[test]
    fn test_check_min_role() {
        assert!(check_min_role(&auth_user("admin"), UserRole::Teacher).is_ok());
        assert!(check_min_role(&auth_user("viewer"), UserRole::Teacher).is_err());
        assert!(check_min_role(&auth_user("user"), UserRole::Viewer).is_err());
    }

    #[test]
    fn test_unknown_role_gets_no_access() {
        assert!(check_min_role(&auth_user("superadmin"), UserRole::Viewer).is_err());
    }
}
