use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Daily log entry for a child: meals, naps, health and behavior notes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: Uuid,
    #[serde(rename = "child")]
    pub child_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub meals: Option<String>,
    pub nap_time: Option<String>,
    pub health_notes: Option<String>,
    pub behavior_notes: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub child_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub meals: Option<String>,
    pub nap_time: Option<String>,
    pub health_notes: Option<String>,
    pub behavior_notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Body for POST /staff/add-activity.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddActivityRequest {
    #[serde(alias = "child")]
    pub child_id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub meals: Option<String>,
    pub nap_time: Option<String>,
    pub health_notes: Option<String>,
    pub behavior_notes: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}
