use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    db::Repositories,
    error::AppResult,
    models::activity::{Activity, AddActivityRequest, NewActivity},
    services::{optional_text, require_text},
};

pub struct ActivityService;

impl ActivityService {
    /// Log an activity for a child already checked to be within scope.
    pub async fn add(
        repos: &Repositories,
        child_id: Uuid,
        req: AddActivityRequest,
        now: DateTime<Utc>,
    ) -> AppResult<Activity> {
        let activity = NewActivity {
            child_id,
            title: require_text(req.title, "Title")?,
            description: optional_text(req.description),
            meals: optional_text(req.meals),
            nap_time: optional_text(req.nap_time),
            health_notes: optional_text(req.health_notes),
            behavior_notes: optional_text(req.behavior_notes),
            timestamp: req.timestamp.unwrap_or(now),
        };
        Ok(repos.activities.create(&activity).await?)
    }

    pub async fn list_for_child(repos: &Repositories, child_id: Uuid) -> AppResult<Vec<Activity>> {
        Ok(repos.activities.list_for_child(child_id).await?)
    }
}
