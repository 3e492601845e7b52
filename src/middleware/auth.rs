use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    error::AppError,
    models::auth::AuthenticatedUser,
    services::auth::AuthService,
    AppState,
};

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::MissingToken)?;

        let claims = AuthService::decode_token(token, &state.config.jwt_secret)?;
        let user = AuthService::resolve(&state.repos, &claims).await?;
        tracing::debug!(user = %user.full_name, role = %user.role, "Request authenticated");
        Ok(user)
    }
}
