use axum::{extract::State, Json};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::{AppError, AppPath, AppResult},
    models::{auth::AuthenticatedUser, user::UserRole},
    services::{
        activities::ActivityService,
        attendance::AttendanceService,
        authorizer::{authorize, parent_child},
        children::ChildService,
        fees::FeeService,
    },
    AppState,
};

pub async fn my_child(State(state): State<AppState>, user: AuthenticatedUser) -> AppResult<Json<Value>> {
    authorize(&user, &[UserRole::Parent])?;
    let parent_id = user
        .principal
        .user_id()
        .ok_or(AppError::UserNotFound)?;
    match ChildService::for_parent(&state.repos, parent_id).await? {
        Some(child) => Ok(Json(json!({ "success": true, "data": child }))),
        None => Ok(Json(json!({
            "success": true,
            "data": null,
            "message": "No child linked to this account"
        }))),
    }
}

pub async fn child_attendance(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Value>> {
    authorize(&user, &[UserRole::Parent])?;
    parent_child(&state.repos, &user, id).await?;
    let records = AttendanceService::list_child_attendance_history(&state.repos, id).await?;
    Ok(Json(json!({ "success": true, "count": records.len(), "data": records })))
}

pub async fn child_activities(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Value>> {
    authorize(&user, &[UserRole::Parent])?;
    parent_child(&state.repos, &user, id).await?;
    let activities = ActivityService::list_for_child(&state.repos, id).await?;
    Ok(Json(json!({ "success": true, "count": activities.len(), "data": activities })))
}

pub async fn child_fees(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Value>> {
    authorize(&user, &[UserRole::Parent])?;
    parent_child(&state.repos, &user, id).await?;
    let fees = FeeService::list_for_child(&state.repos, id).await?;
    Ok(Json(json!({ "success": true, "count": fees.len(), "data": fees })))
}
