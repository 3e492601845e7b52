use uuid::Uuid;

use crate::{db::Repositories, error::AppResult, models::fee::Fee};

/// Fees are read-only through the API.
pub struct FeeService;

impl FeeService {
    pub async fn list_for_child(repos: &Repositories, child_id: Uuid) -> AppResult<Vec<Fee>> {
        Ok(repos.fees.list_for_child(child_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::fee::FeeStatus, test_support::TestApp};
    use chrono::NaiveDate;

    #[tokio::test]
    async fn latest_due_date_first() {
        let app = TestApp::new();
        let child = app.child("Milo", None, None, None).await;
        let march = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let april = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        app.store.insert_fee(child.id, 450.0, FeeStatus::Paid, march);
        app.store.insert_fee(child.id, 450.0, FeeStatus::Pending, april);

        let fees = FeeService::list_for_child(&app.state.repos, child.id).await.unwrap();
        assert_eq!(fees.len(), 2);
        assert_eq!(fees[0].due_date, april);
        assert_eq!(fees[0].status, FeeStatus::Pending);
    }
}
