//! Role gate and assignment-scope gate.
//!
//! Handlers call [`authorize`] first, then one of the scope helpers when the
//! operation targets a specific child.

use uuid::Uuid;

use crate::{
    db::Repositories,
    error::{AppError, AppResult},
    models::{auth::AuthenticatedUser, child::Child, staff::StaffProfile, user::UserRole},
};

pub fn authorize(user: &AuthenticatedUser, roles: &[UserRole]) -> AppResult<()> {
    if roles.contains(&user.role) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "Role ({}) is not authorized to access this route",
            user.role
        )))
    }
}

/// The staff profile linked to this identity. The bootstrap administrator has none.
pub async fn resolve_staff_profile(repos: &Repositories, user: &AuthenticatedUser) -> AppResult<StaffProfile> {
    let Some(user_id) = user.principal.user_id() else {
        return Err(AppError::StaffProfileNotFound);
    };
    repos
        .staff
        .find_by_user_id(user_id)
        .await?
        .ok_or(AppError::StaffProfileNotFound)
}

/// Who may act on children in a staff-scoped operation.
#[derive(Debug, Clone)]
pub enum StaffScope {
    /// Administrators act on any child.
    Unrestricted,
    Assigned(StaffProfile),
}

impl StaffScope {
    pub async fn for_user(repos: &Repositories, user: &AuthenticatedUser) -> AppResult<Self> {
        if user.role == UserRole::Admin {
            return Ok(StaffScope::Unrestricted);
        }
        resolve_staff_profile(repos, user).await.map(StaffScope::Assigned)
    }

    /// Load the child and require it to be within scope.
    pub async fn child(&self, repos: &Repositories, child_id: Uuid) -> AppResult<Child> {
        let child = find_child(repos, child_id).await?;
        match self {
            StaffScope::Unrestricted => Ok(child),
            StaffScope::Assigned(profile) if child.is_assigned_to(profile.id) => Ok(child),
            StaffScope::Assigned(_) => Err(AppError::forbidden(
                "You are not assigned to this child",
            )),
        }
    }
}

/// Load a child that must be linked to the requesting parent.
pub async fn parent_child(repos: &Repositories, user: &AuthenticatedUser, child_id: Uuid) -> AppResult<Child> {
    let child = find_child(repos, child_id).await?;
    match user.principal.user_id() {
        Some(parent_id) if child.parent_id == Some(parent_id) => Ok(child),
        _ => Err(AppError::forbidden("Not authorized to view this child")),
    }
}

async fn find_child(repos: &Repositories, child_id: Uuid) -> AppResult<Child> {
    repos
        .children
        .find_by_id(child_id)
        .await?
        .ok_or_else(|| AppError::not_found("Child not found"))
}
