//! Official agency update endpoints

use axum::extract::{Path, State};
use serde::Deserialize;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Query};
use crate::infrastructure::services::{
    RefreshResult, SourcesResult, UpdatesQuery, UpdatesResult, DEFAULT_UPDATES_LIMIT,
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatesParams {
    pub limit: Option<usize>,
    pub priority: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub fresh: bool,
}

impl From<UpdatesParams> for UpdatesQuery {
    fn from(params: UpdatesParams) -> Self {
        Self {
            limit: params.limit.unwrap_or(DEFAULT_UPDATES_LIMIT),
            priority: params.priority.filter(|p| !p.is_empty()),
            category: params.category.filter(|c| !c.is_empty()),
            fresh: params.fresh,
        }
    }
}

/// GET /api/disasters/{id}/official-updates
pub async fn list_updates(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
    Path(disaster_id): Path<String>,
    Query(params): Query<UpdatesParams>,
) -> Result<Json<UpdatesResult>, ApiError> {
    let result = state
        .official_updates_service
        .list(&disaster_id, &params.into())
        .await?;

    Ok(Json(result))
}

/// GET /api/disasters/{id}/official-updates/sources
pub async fn list_sources(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
    Path(disaster_id): Path<String>,
) -> Result<Json<SourcesResult>, ApiError> {
    let result = state.official_updates_service.sources(&disaster_id).await?;
    Ok(Json(result))
}

/// POST /api/disasters/{id}/official-updates/refresh
pub async fn refresh_updates(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
    Path(disaster_id): Path<String>,
) -> Result<Json<RefreshResult>, ApiError> {
    let result = state.official_updates_service.refresh(&disaster_id).await?;
    Ok(Json(result))
}
