use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{
    error::{AppJson, AppResult},
    models::{
        auth::AuthenticatedUser,
        user::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserRole},
    },
    services::{auth::AuthService, authorizer::authorize},
    AppState,
};

pub async fn login(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    AuthService::login(&state.repos, &state.config, &body.email, &body.password)
        .await
        .map(Json)
}

pub async fn register(
    State(state): State<AppState>,
    AppJson(body): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let user = AuthService::register(&state.repos, &state.config, body).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Parent identities, for linking a child to its parent account.
pub async fn list_parents(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<Value>> {
    authorize(&user, &[UserRole::Admin])?;
    let parents = AuthService::list_parents(&state.repos).await?;
    Ok(Json(json!({ "success": true, "count": parents.len(), "data": parents })))
}
