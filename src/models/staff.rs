use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{text_enum, user::AccountStatus, Gender};

text_enum!(
    /// Job title of a staff member (sent as `role` on the wire).
    StaffTitle, "staff role" {
        Teacher => "Teacher",
        Caretaker => "Caretaker",
        Admin => "Admin",
        Principal => "Principal",
    }
);

text_enum!(
    ProfileStatus, "staff status" {
        Active => "Active",
        Inactive => "Inactive",
        Pending => "Pending",
        Rejected => "Rejected",
    }
);

impl From<AccountStatus> for ProfileStatus {
    fn from(s: AccountStatus) -> Self {
        match s {
            AccountStatus::Pending => ProfileStatus::Pending,
            AccountStatus::Active => ProfileStatus::Active,
            AccountStatus::Rejected => ProfileStatus::Rejected,
        }
    }
}

/// HR profile of a staff member. `user_id` links it to the staff identity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StaffProfile {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "role")]
    #[sqlx(try_from = "String")]
    pub title: StaffTitle,
    pub dob: NaiveDate,
    #[sqlx(try_from = "String")]
    pub gender: Gender,
    pub joining_date: NaiveDate,
    pub qualification: String,
    pub experience: String,
    pub address: String,
    #[sqlx(try_from = "String")]
    pub status: ProfileStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated, fully-populated profile fields ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffProfileFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub title: StaffTitle,
    pub dob: NaiveDate,
    pub gender: Gender,
    pub joining_date: NaiveDate,
    pub qualification: String,
    pub experience: String,
    pub address: String,
    pub status: ProfileStatus,
}

/// Body of `POST /staff` and `PUT /staff/me`. Everything is optional at the
/// serde level so missing fields are reported as validation errors.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub qualification: Option<String>,
    pub experience: Option<String>,
    pub address: Option<String>,
    pub status: Option<String>,
}
