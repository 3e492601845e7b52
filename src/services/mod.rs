pub mod activities;
pub mod approval;
pub mod attendance;
pub mod auth;
pub mod authorizer;
pub mod children;
pub mod dashboard;
pub mod fees;
pub mod metrics;
pub mod staff;

use std::str::FromStr;

use crate::{
    error::{AppError, AppResult},
    models::ParseEnumError,
};

/// A mandatory text field: present and not blank. Returned trimmed.
pub(crate) fn require_text(value: Option<String>, field: &str) -> AppResult<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::invalid(format!("{field} is required"))),
    }
}

/// Optional text: blank collapses to `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn require<T>(value: Option<T>, field: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::invalid(format!("{field} is required")))
}

/// Parse one of the closed text enums, reporting bad values as `InvalidInput`.
pub(crate) fn parse_enum<T>(value: &str) -> AppResult<T>
where
    T: FromStr<Err = ParseEnumError>,
{
    value.parse().map_err(|e: ParseEnumError| AppError::invalid(e.to_string()))
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
