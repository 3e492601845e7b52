use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::text_enum;

text_enum!(
    UserRole, "role" {
        Admin => "admin",
        Staff => "staff",
        Parent => "parent",
    }
);

text_enum!(
    /// Approval state of an identity. Only staff identities ever sit in `pending`.
    AccountStatus, "account status" {
        Pending => "pending",
        Active => "active",
        Rejected => "rejected",
    }
);

impl AccountStatus {
    /// Status given to a freshly registered identity of `role`.
    pub fn initial_for(role: UserRole) -> Self {
        match role {
            UserRole::Staff => AccountStatus::Pending,
            UserRole::Admin | UserRole::Parent => AccountStatus::Active,
        }
    }
}

/// Identity row. Enum columns are TEXT and decoded through `TryFrom<String>`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: UserRole,
    #[sqlx(try_from = "String")]
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to insert a new identity.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub status: AccountStatus,
}

/// Minimal parent listing used when linking a child to its parent account.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ParentSummary {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
}

// Request/Response DTOs
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Either a UUID or the bootstrap administrator's synthetic id.
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<User> for RegisterResponse {
    fn from(u: User) -> Self {
        Self {
            message: "Account created successfully!".to_string(),
            id: u.id,
            full_name: u.full_name,
            email: u.email,
            role: u.role,
        }
    }
}
