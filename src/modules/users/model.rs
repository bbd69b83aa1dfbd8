//! User models and role definitions.
//!
//! The `users` collection persists camelCase field names (a legacy of the
//! original console); [`UserDoc`] is that stored shape and [`User`] the
//! canonical API shape. All conversion happens here so the rest of the
//! system only ever sees one representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;
use utoipa::ToSchema;
use validator::Validate;

use crate::store::Document;
use crate::utils::errors::AppError;
use crate::utils::pagination::{PageMeta, PageParams};

pub const COLLECTION: &str = "users";

/// Privilege level carried in the identity token's role claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Teacher,
    Viewer,
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Viewer => "viewer",
            Self::User => "user",
        }
    }

    /// Parses a role claim. Unrecognized values degrade to the lowest
    /// privilege instead of failing: tokens come from an external identity
    /// provider and a bad claim must not grant anything.
    pub fn from_claim(claim: &str) -> Self {
        match claim {
            "admin" => Self::Admin,
            "teacher" => Self::Teacher,
            "viewer" => Self::Viewer,
            "user" => Self::User,
            other => {
                warn!(role = other, "unrecognized role claim, defaulting to user");
                Self::User
            }
        }
    }

    /// Parses a user-supplied role value, rejecting unknown strings.
    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "admin" => Ok(Self::Admin),
            "teacher" => Ok(Self::Teacher),
            "viewer" => Ok(Self::Viewer),
            "user" => Ok(Self::User),
            other => Err(AppError::validation(format!("Invalid role: {}", other))),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Admin => 3,
            Self::Teacher => 2,
            Self::Viewer => 1,
            Self::User => 0,
        }
    }

    /// Whether this role has at least the privileges of `minimum`.
    pub fn at_least(&self, minimum: UserRole) -> bool {
        self.rank() >= minimum.rank()
    }
}

/// Stored shape of a user document (legacy camelCase fields).
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDoc {
    pub display_name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Canonical user representation.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct User {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub role: UserRole,
    pub disabled: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn from_doc(doc: Document) -> Result<Self, AppError> {
        let id = doc.id;
        let parsed: UserDoc = serde_json::from_value(doc.data).map_err(|e| {
            AppError::internal(anyhow::anyhow!("malformed user document {}: {}", id, e))
        })?;
        Ok(Self {
            id,
            display_name: parsed.display_name,
            email: parsed.email,
            role: parsed.role,
            disabled: parsed.disabled,
            last_login_at: parsed.last_login_at,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1))]
    pub display_name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default = "default_new_user_role")]
    pub role: UserRole,
}

fn default_new_user_role() -> UserRole {
    UserRole::User
}

impl CreateUserDto {
    pub fn to_doc(&self) -> Value {
        json!({
            "displayName": self.display_name,
            "email": self.email,
            "role": self.role,
            "disabled": false,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(min = 1))]
    pub display_name: Option<String>,
    pub disabled: Option<bool>,
}

impl UpdateUserDto {
    pub fn to_patch(&self) -> Value {
        let mut patch = serde_json::Map::new();
        if let Some(display_name) = &self.display_name {
            patch.insert("displayName".to_string(), json!(display_name));
        }
        if let Some(disabled) = self.disabled {
            patch.insert("disabled".to_string(), json!(disabled));
        }
        Value::Object(patch)
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetRoleDto {
    pub role: UserRole,
}

/// Query parameters for filtering users.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UserFilterParams {
    pub role: Option<String>,
    pub email: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub success: bool,
    pub user: User,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserListResponse {
    pub success: bool,
    pub data: Vec<User>,
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_role_hierarchy() {
        assert!(UserRole::Admin.at_least(UserRole::Teacher));
        assert!(UserRole::Teacher.at_least(UserRole::Viewer));
        assert!(UserRole::Viewer.at_least(UserRole::User));
        assert!(!UserRole::User.at_least(UserRole::Viewer));
        assert!(!UserRole::Teacher.at_least(UserRole::Admin));
    }

    #[test]
    fn test_unknown_claim_degrades_to_user() {
        assert_eq!(UserRole::from_claim("superadmin"), UserRole::User);
        assert_eq!(UserRole::from_claim("admin"), UserRole::Admin);
    }

    #[test]
    fn test_parse_rejects_unknown_role() {
        assert!(UserRole::parse("root").is_err());
        assert_eq!(UserRole::parse("viewer").unwrap(), UserRole::Viewer);
    }

    #[test]
    fn test_user_from_doc_maps_camel_case_fields() {
        let now = Utc::now();
        let doc = Document {
            id: "u1".to_string(),
            data: json!({
                "displayName": "Ada",
                "email": "ada@example.com",
                "role": "teacher",
            }),
            created_at: now,
            updated_at: now,
        };

        let user = User::from_doc(doc).unwrap();
        assert_eq!(user.display_name, "Ada");
        assert_eq!(user.role, UserRole::Teacher);
        assert!(!user.disabled);
    }

    #[test]
    fn test_update_patch_only_carries_present_fields() {
        let dto = UpdateUserDto {
            display_name: Some("New".to_string()),
            disabled: None,
        };
        let patch = dto.to_patch();
        assert_eq!(patch["displayName"], "New");
        assert!(patch.get("disabled").is_none());
    }
}
