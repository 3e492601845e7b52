//! Staff profile administration and the staff self-service endpoints.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::{AppError, AppJson, AppPath, AppResult},
    models::{
        activity::AddActivityRequest,
        attendance::MarkAttendanceRequest,
        auth::AuthenticatedUser,
        staff::StaffProfileRequest,
        user::UserRole,
    },
    services::{
        activities::ActivityService,
        attendance::AttendanceService,
        authorizer::{authorize, resolve_staff_profile, StaffScope},
        dashboard::compute_staff_dashboard,
        staff::StaffService,
    },
    AppState,
};

// ── Admin CRUD ────────────────────────────────────────────────────────────

pub async fn create_staff(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppJson(body): AppJson<StaffProfileRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    authorize(&user, &[UserRole::Admin])?;
    let profile = StaffService::create(&state.repos, body).await?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "data": profile }))))
}

/// Active profiles only.
pub async fn list_staff(State(state): State<AppState>, user: AuthenticatedUser) -> AppResult<Json<Value>> {
    authorize(&user, &[UserRole::Admin])?;
    let staff = StaffService::list_active(&state.repos).await?;
    Ok(Json(json!({ "success": true, "count": staff.len(), "data": staff })))
}

pub async fn get_staff(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Value>> {
    authorize(&user, &[UserRole::Admin])?;
    let profile = StaffService::get(&state.repos, id).await?;
    Ok(Json(json!({ "success": true, "data": profile })))
}

pub async fn update_staff(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(body): AppJson<StaffProfileRequest>,
) -> AppResult<Json<Value>> {
    authorize(&user, &[UserRole::Admin])?;
    let profile = StaffService::update(&state.repos, id, body).await?;
    Ok(Json(json!({ "success": true, "data": profile })))
}

pub async fn delete_staff(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Value>> {
    authorize(&user, &[UserRole::Admin])?;
    StaffService::delete(&state.repos, id).await?;
    Ok(Json(json!({ "success": true, "data": {}, "message": "Staff member removed" })))
}

// ── Self-service ──────────────────────────────────────────────────────────

pub async fn assigned_children(State(state): State<AppState>, user: AuthenticatedUser) -> AppResult<Json<Value>> {
    let profile = resolve_staff_profile(&state.repos, &user).await?;
    let children = StaffService::assigned_children(&state.repos, &profile).await?;
    Ok(Json(json!({ "success": true, "count": children.len(), "data": children })))
}

pub async fn mark_attendance(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppJson(body): AppJson<MarkAttendanceRequest>,
) -> AppResult<Json<Value>> {
    let child_id = body
        .child_id
        .ok_or_else(|| AppError::invalid("Child ID is required"))?;
    let scope = StaffScope::for_user(&state.repos, &user).await?;
    scope.child(&state.repos, child_id).await?;

    let record = AttendanceService::upsert_child_attendance(&state.repos, child_id, body, Utc::now()).await?;
    Ok(Json(json!({ "success": true, "message": "Attendance marked", "data": record })))
}

pub async fn add_activity(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppJson(body): AppJson<AddActivityRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let child_id = body
        .child_id
        .ok_or_else(|| AppError::invalid("Child ID is required"))?;
    let scope = StaffScope::for_user(&state.repos, &user).await?;
    scope.child(&state.repos, child_id).await?;

    let activity = ActivityService::add(&state.repos, child_id, body, Utc::now()).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "Activity added", "data": activity })),
    ))
}

pub async fn dashboard_stats(State(state): State<AppState>, user: AuthenticatedUser) -> AppResult<Json<Value>> {
    let profile = resolve_staff_profile(&state.repos, &user).await?;
    let stats = compute_staff_dashboard(&state.repos, &profile, Utc::now()).await?;
    Ok(Json(json!({ "success": true, "data": stats })))
}

pub async fn get_me(State(state): State<AppState>, user: AuthenticatedUser) -> AppResult<Json<Value>> {
    let profile = StaffService::own_profile(&state.repos, &user).await?;
    Ok(Json(json!({ "success": true, "data": profile })))
}

pub async fn update_me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppJson(body): AppJson<StaffProfileRequest>,
) -> AppResult<Json<Value>> {
    let profile = StaffService::upsert_own(&state.repos, &user, body).await?;
    Ok(Json(json!({ "success": true, "message": "Profile saved", "data": profile })))
}
