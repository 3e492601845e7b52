use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::text_enum;

text_enum!(
    FeeStatus, "fee status" {
        Paid => "Paid",
        Pending => "Pending",
    }
);

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Fee {
    pub id: Uuid,
    #[serde(rename = "child")]
    pub child_id: Uuid,
    pub amount: f64,
    #[sqlx(try_from = "String")]
    pub status: FeeStatus,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}
