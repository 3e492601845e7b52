use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::{AppJson, AppPath, AppResult},
    models::{auth::AuthenticatedUser, child::ChildRequest, user::UserRole},
    services::{authorizer::authorize, children::ChildService},
    AppState,
};

pub async fn list_children(State(state): State<AppState>, user: AuthenticatedUser) -> AppResult<Json<Value>> {
    authorize(&user, &[UserRole::Admin])?;
    let children = ChildService::list(&state.repos).await?;
    Ok(Json(json!({ "success": true, "count": children.len(), "data": children })))
}

pub async fn create_child(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppJson(body): AppJson<ChildRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    authorize(&user, &[UserRole::Admin])?;
    let child = ChildService::create(&state.repos, body).await?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "data": child }))))
}

pub async fn get_child(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Value>> {
    authorize(&user, &[UserRole::Admin])?;
    let child = ChildService::get(&state.repos, id).await?;
    Ok(Json(json!({ "success": true, "data": child })))
}

pub async fn update_child(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(body): AppJson<ChildRequest>,
) -> AppResult<Json<Value>> {
    authorize(&user, &[UserRole::Admin])?;
    let child = ChildService::update(&state.repos, id, body).await?;
    Ok(Json(json!({ "success": true, "data": child })))
}

pub async fn delete_child(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Value>> {
    authorize(&user, &[UserRole::Admin])?;
    ChildService::delete(&state.repos, id).await?;
    Ok(Json(json!({ "success": true, "data": {}, "message": "Child removed" })))
}
