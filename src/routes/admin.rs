use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::{AppJson, AppPath, AppQuery, AppResult},
    models::{
        attendance::{AttendanceDateQuery, StaffAttendanceRequest},
        auth::AuthenticatedUser,
        user::{AccountStatus, UserRole},
    },
    services::{approval::ApprovalService, attendance::AttendanceService, authorizer::authorize},
    AppState,
};

async fn staff_identities(
    state: &AppState,
    user: &AuthenticatedUser,
    status: Option<AccountStatus>,
) -> AppResult<Json<Value>> {
    authorize(user, &[UserRole::Admin])?;
    let staff = state.repos.users.list_by_role(UserRole::Staff, status).await?;
    Ok(Json(json!({ "success": true, "count": staff.len(), "data": staff })))
}

pub async fn list_staff(State(state): State<AppState>, user: AuthenticatedUser) -> AppResult<Json<Value>> {
    staff_identities(&state, &user, None).await
}

pub async fn list_pending_staff(State(state): State<AppState>, user: AuthenticatedUser) -> AppResult<Json<Value>> {
    staff_identities(&state, &user, Some(AccountStatus::Pending)).await
}

pub async fn list_active_staff(State(state): State<AppState>, user: AuthenticatedUser) -> AppResult<Json<Value>> {
    staff_identities(&state, &user, Some(AccountStatus::Active)).await
}

pub async fn approve_staff(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Value>> {
    authorize(&user, &[UserRole::Admin])?;
    let staff = ApprovalService::approve(&state.repos, id).await?;
    Ok(Json(json!({ "success": true, "message": "Staff approved successfully", "data": staff })))
}

pub async fn reject_staff(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Value>> {
    authorize(&user, &[UserRole::Admin])?;
    let staff = ApprovalService::reject(&state.repos, id).await?;
    Ok(Json(json!({ "success": true, "message": "Staff rejected successfully", "data": staff })))
}

pub async fn mark_staff_attendance(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppJson(body): AppJson<StaffAttendanceRequest>,
) -> AppResult<Json<Value>> {
    authorize(&user, &[UserRole::Admin])?;
    let record = AttendanceService::upsert_staff_attendance(&state.repos, body, Utc::now()).await?;
    Ok(Json(json!({ "success": true, "message": "Attendance marked", "data": record })))
}

pub async fn list_staff_attendance(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppQuery(query): AppQuery<AttendanceDateQuery>,
) -> AppResult<Json<Value>> {
    authorize(&user, &[UserRole::Admin])?;
    let records =
        AttendanceService::list_staff_attendance_on(&state.repos, query.date.as_deref(), Utc::now()).await?;
    Ok(Json(json!({ "success": true, "count": records.len(), "data": records })))
}

pub async fn list_children_attendance(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppQuery(query): AppQuery<AttendanceDateQuery>,
) -> AppResult<Json<Value>> {
    authorize(&user, &[UserRole::Admin])?;
    let records =
        AttendanceService::list_child_attendance_for_day(&state.repos, query.date.as_deref(), Utc::now()).await?;
    Ok(Json(json!({ "success": true, "count": records.len(), "data": records })))
}
