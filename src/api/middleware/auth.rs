//! Header-based caller identification
//!
//! The caller names a known user via `x-user-id: <id>` or
//! `Authorization: Bearer <id>`; there are no credentials to check.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::user::User;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor that requires a known user
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = extract_user_id(&parts.headers)?;

        let user = state
            .user_directory
            .find(&user_id)
            .await
            .ok_or_else(|| ApiError::unauthorized("Invalid user: user not found in system"))?;

        debug!(user_id = %user.id, role = %user.role, "Authenticated user");

        Ok(RequireUser(user))
    }
}

/// Extractor that requires a known user with the admin role
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireUser(user) = RequireUser::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            debug!(user_id = %user.id, role = %user.role, "Admin access denied");
            return Err(ApiError::forbidden(format!(
                "Insufficient permissions: admin role required, current role is {}",
                user.role
            )));
        }

        Ok(RequireAdmin(user))
    }
}

/// Reads the caller id, `x-user-id` taking precedence over a bearer token
pub fn extract_user_id(headers: &HeaderMap) -> Result<String, ApiError> {
    if let Some(value) = headers.get(USER_ID_HEADER) {
        let id = value
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid x-user-id header encoding"))?
            .trim();

        if !id.is_empty() {
            return Ok(id.to_string());
        }
    }

    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

        if let Some(id) = auth_str.strip_prefix("Bearer ") {
            let id = id.trim();
            if !id.is_empty() {
                return Ok(id.to_string());
            }
        }
    }

    Err(ApiError::unauthorized(
        "Authentication required. Provide x-user-id header or 'Authorization: Bearer <user id>'",
    ))
}
