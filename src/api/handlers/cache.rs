//! Cache administration endpoints

use axum::extract::{Path, State};
use serde::Serialize;
use tracing::info;

use crate::api::middleware::{RequireAdmin, RequireUser};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::infrastructure::cache::CacheStats;

#[derive(Debug, Clone, Serialize)]
pub struct CacheActionResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<u64>,
}

/// GET /api/cache/stats
pub async fn cache_stats(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
) -> Json<CacheStats> {
    Json(state.cache.stats().await)
}

/// DELETE /api/cache
pub async fn clear_cache(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
) -> Result<Json<CacheActionResponse>, ApiError> {
    let removed = state
        .cache
        .clear_count()
        .await
        .ok_or_else(|| ApiError::unavailable("Cache storage is unavailable"))?;

    info!(user_id = %user.id, removed, "Cache cleared");

    Ok(Json(CacheActionResponse {
        success: true,
        message: "Cache cleared".to_string(),
        removed: Some(removed),
    }))
}

/// POST /api/cache/cleanup
pub async fn cleanup_cache(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
) -> Result<Json<CacheActionResponse>, ApiError> {
    let removed = state
        .cache
        .cleanup_count()
        .await
        .ok_or_else(|| ApiError::unavailable("Cache storage is unavailable"))?;

    info!(user_id = %user.id, removed, "Expired cache entries removed");

    Ok(Json(CacheActionResponse {
        success: true,
        message: "Expired cache entries removed".to_string(),
        removed: Some(removed),
    }))
}

/// DELETE /api/cache/{key}
///
/// Deleting a missing key succeeds.
pub async fn delete_cache_key(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(key): Path<String>,
) -> Result<Json<CacheActionResponse>, ApiError> {
    if !state.cache.delete(&key).await {
        return Err(ApiError::unavailable("Cache storage is unavailable"));
    }

    info!(user_id = %user.id, key = %key, "Cache key deleted");

    Ok(Json(CacheActionResponse {
        success: true,
        message: format!("Cache key {} deleted", key),
        removed: None,
    }))
}
