use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    db::Repositories,
    error::AppResult,
    models::{attendance::ChildAttendanceStatus, staff::StaffProfile},
    services::attendance::day_window,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffDashboard {
    pub total_children: usize,
    pub present_today: usize,
    pub absent_today: usize,
    pub activities_today: i64,
}

/// Today's figures over the children this profile teaches or cares for.
/// Unmarked children count toward neither present nor absent.
pub async fn compute_staff_dashboard(
    repos: &Repositories,
    profile: &StaffProfile,
    now: DateTime<Utc>,
) -> AppResult<StaffDashboard> {
    let children = repos.children.list_assigned_to(profile.id).await?;
    let ids: Vec<Uuid> = children.iter().map(|c| c.id).collect();

    let (start, end) = day_window(now)?;

    let records = repos.attendance.list_for_children_between(&ids, start, end).await?;
    let present_today = records
        .iter()
        .filter(|r| r.status == ChildAttendanceStatus::Present)
        .count();
    let absent_today = records
        .iter()
        .filter(|r| r.status == ChildAttendanceStatus::Absent)
        .count();
    let activities_today = repos.activities.count_for_children_between(&ids, start, end).await?;

    Ok(StaffDashboard {
        total_children: children.len(),
        present_today,
        absent_today,
        activities_today,
    })
}
