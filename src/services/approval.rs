use tracing::info;
use uuid::Uuid;

use crate::{
    db::Repositories,
    error::{AppError, AppResult},
    models::user::{AccountStatus, User, UserRole},
    services::metrics,
};

/// Staff account approval: `pending → active` or `pending → rejected`.
pub struct ApprovalService;

impl ApprovalService {
    pub async fn approve(repos: &Repositories, id: Uuid) -> AppResult<User> {
        Self::transition(repos, id, AccountStatus::Active).await
    }

    pub async fn reject(repos: &Repositories, id: Uuid) -> AppResult<User> {
        Self::transition(repos, id, AccountStatus::Rejected).await
    }

    async fn transition(repos: &Repositories, id: Uuid, to: AccountStatus) -> AppResult<User> {
        let current = Self::find_staff(repos, id).await?;
        if current.status != AccountStatus::Pending {
            return Err(already(current.status));
        }

        // The store re-checks `pending` inside its transaction; losing a race
        // reports the state the winner left behind.
        let updated = match repos
            .users
            .transition_staff_status(id, AccountStatus::Pending, to)
            .await?
        {
            Some(u) => u,
            None => return Err(already(Self::find_staff(repos, id).await?.status)),
        };

        metrics::record_approval(to.as_str());
        info!(user_id = %id, status = %to, "Staff account status changed");
        Ok(updated)
    }

    async fn find_staff(repos: &Repositories, id: Uuid) -> AppResult<User> {
        match repos.users.find_by_id(id).await? {
            Some(u) if u.role == UserRole::Staff => Ok(u),
            _ => Err(AppError::not_found("Staff not found")),
        }
    }
}

fn already(status: AccountStatus) -> AppError {
    AppError::invalid(format!("Staff account is already {status}"))
}
