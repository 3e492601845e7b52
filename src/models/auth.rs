use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::{User, UserRole};

/// Synthetic subject of the configured bootstrap administrator. Never stored.
pub const BOOTSTRAP_ADMIN_ID: &str = "admin-id";
pub const BOOTSTRAP_ADMIN_NAME: &str = "Administrator";

/// Claims embedded in the JWT access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user UUID or BOOTSTRAP_ADMIN_ID
    pub exp: usize,
    pub iat: usize,
}

/// Who the request is acting as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    BootstrapAdmin,
    User(Uuid),
}

impl Principal {
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Principal::BootstrapAdmin => None,
            Principal::User(id) => Some(*id),
        }
    }
}

/// The identity a request acts as, resolved from its bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub principal: Principal,
    pub full_name: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn bootstrap_admin() -> Self {
        Self {
            principal: Principal::BootstrapAdmin,
            full_name: BOOTSTRAP_ADMIN_NAME.to_string(),
            role: UserRole::Admin,
        }
    }
}

impl From<User> for AuthenticatedUser {
    fn from(u: User) -> Self {
        Self {
            principal: Principal::User(u.id),
            full_name: u.full_name,
            role: u.role,
        }
    }
}
