//! Disaster CRUD endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::{RequireAdmin, RequireUser};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Query};
use crate::domain::disaster::{Disaster, DisasterChanges};
use crate::infrastructure::services::{CreateDisasterRequest, DisasterFilter};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListDisastersParams {
    pub tag: Option<String>,
    pub owner_id: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl From<ListDisastersParams> for DisasterFilter {
    fn from(params: ListDisastersParams) -> Self {
        let defaults = DisasterFilter::default();

        Self {
            tag: params.tag,
            owner_id: params.owner_id,
            limit: params.limit.unwrap_or(defaults.limit),
            offset: params.offset.unwrap_or(defaults.offset),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListDisastersResponse {
    pub disasters: Vec<Disaster>,
    pub count: usize,
    pub filters: DisasterFilter,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDisasterApiRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteDisasterResponse {
    pub message: &'static str,
    pub id: String,
}

/// GET /api/disasters
pub async fn list_disasters(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
    Query(params): Query<ListDisastersParams>,
) -> Result<Json<ListDisastersResponse>, ApiError> {
    let filter = DisasterFilter::from(params);
    let disasters = state.disaster_service.list(&filter).await?;

    debug!(count = disasters.len(), "Listed disasters");

    Ok(Json(ListDisastersResponse {
        count: disasters.len(),
        disasters,
        filters: filter,
    }))
}

/// GET /api/disasters/{id}
pub async fn get_disaster(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
    Path(id): Path<String>,
) -> Result<Json<Disaster>, ApiError> {
    let disaster = state.disaster_service.get_required(&id).await?;
    Ok(Json(disaster))
}

/// POST /api/disasters
pub async fn create_disaster(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<CreateDisasterApiRequest>,
) -> Result<(StatusCode, Json<Disaster>), ApiError> {
    debug!(title = %request.title, user_id = %user.id, "Creating disaster");

    let disaster = state
        .disaster_service
        .create(
            CreateDisasterRequest {
                title: request.title,
                location_name: request.location_name,
                description: request.description,
                tags: request.tags,
            },
            &user,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(disaster)))
}

/// PUT /api/disasters/{id}
pub async fn update_disaster(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
    Json(changes): Json<DisasterChanges>,
) -> Result<Json<Disaster>, ApiError> {
    let disaster = state.disaster_service.update(&id, changes, &user).await?;
    Ok(Json(disaster))
}

/// DELETE /api/disasters/{id}
pub async fn delete_disaster(
    State(state): State<AppState>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<DeleteDisasterResponse>, ApiError> {
    let disaster = state.disaster_service.delete(&id, &user).await?;

    Ok(Json(DeleteDisasterResponse {
        message: "Disaster deleted successfully",
        id: disaster.id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_default_to_first_page() {
        let filter = DisasterFilter::from(ListDisastersParams::default());

        assert_eq!(filter.limit, 50);
        assert_eq!(filter.offset, 0);
        assert!(filter.tag.is_none());
    }

    #[test]
    fn test_params_override_paging() {
        let filter = DisasterFilter::from(ListDisastersParams {
            tag: Some("flood".into()),
            owner_id: None,
            limit: Some(5),
            offset: Some(10),
        });

        assert_eq!(filter.tag.as_deref(), Some("flood"));
        assert_eq!((filter.limit, filter.offset), (5, 10));
    }
}
