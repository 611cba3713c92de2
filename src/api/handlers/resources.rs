//! Resource search and management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::debug;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Query};
use crate::domain::resource::{Resource, ResourceChanges};
use crate::infrastructure::services::{
    CreateResourceRequest, ResourceSearchQuery, ResourceSearchResult, ResourceTypeCounts,
    DEFAULT_RADIUS_KM, DEFAULT_STATUS,
};

/// `lon` and `lng` are both accepted for the longitude
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceSearchParams {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<f64>,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub status: Option<String>,
}

impl From<ResourceSearchParams> for ResourceSearchQuery {
    fn from(params: ResourceSearchParams) -> Self {
        Self {
            lat: params.lat,
            lng: params.lng.or(params.lon),
            radius_km: params.radius.unwrap_or(DEFAULT_RADIUS_KM),
            resource_type: params.resource_type.filter(|t| !t.is_empty()),
            status: params
                .status
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateResourceApiRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location_name: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[serde(rename = "type", default)]
    pub resource_type: String,
    pub capacity: Option<u32>,
    pub contact: Option<String>,
    #[serde(default)]
    pub services: Vec<String>,
}

impl From<CreateResourceApiRequest> for CreateResourceRequest {
    fn from(request: CreateResourceApiRequest) -> Self {
        Self {
            name: request.name,
            location_name: request.location_name,
            lat: request.lat,
            lng: request.lng,
            resource_type: request.resource_type,
            capacity: request.capacity,
            contact: request.contact,
            services: request.services,
        }
    }
}

/// GET /api/disasters/{id}/resources
pub async fn search_resources(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
    Path(disaster_id): Path<String>,
    Query(params): Query<ResourceSearchParams>,
) -> Result<Json<ResourceSearchResult>, ApiError> {
    let query = ResourceSearchQuery::from(params);

    debug!(
        disaster_id = %disaster_id,
        radius_km = query.radius_km,
        resource_type = ?query.resource_type,
        "Searching resources"
    );

    let result = state.resource_service.search(&disaster_id, &query).await?;
    Ok(Json(result))
}

/// GET /api/disasters/{id}/resources/types
pub async fn resource_types(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
    Path(disaster_id): Path<String>,
) -> Result<Json<ResourceTypeCounts>, ApiError> {
    let counts = state.resource_service.types(&disaster_id).await?;
    Ok(Json(counts))
}

/// POST /api/disasters/{id}/resources
pub async fn create_resource(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(disaster_id): Path<String>,
    Json(request): Json<CreateResourceApiRequest>,
) -> Result<(StatusCode, Json<Resource>), ApiError> {
    let resource = state
        .resource_service
        .create(&disaster_id, request.into(), &user)
        .await?;

    Ok((StatusCode::CREATED, Json(resource)))
}

/// PUT /api/disasters/{id}/resources/{resource_id}
pub async fn update_resource(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path((disaster_id, resource_id)): Path<(String, String)>,
    Json(changes): Json<ResourceChanges>,
) -> Result<Json<Resource>, ApiError> {
    let resource = state
        .resource_service
        .update(&disaster_id, &resource_id, changes, &user)
        .await?;

    Ok(Json(resource))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_defaults() {
        let query = ResourceSearchQuery::from(ResourceSearchParams::default());

        assert_eq!(query, ResourceSearchQuery::default());
    }

    #[test]
    fn test_lon_alias() {
        let query = ResourceSearchQuery::from(ResourceSearchParams {
            lat: Some(40.7128),
            lon: Some(-74.0060),
            ..Default::default()
        });

        assert_eq!(query.lng, Some(-74.0060));
    }

    #[test]
    fn test_lng_wins_over_lon() {
        let query = ResourceSearchQuery::from(ResourceSearchParams {
            lon: Some(1.0),
            lng: Some(2.0),
            ..Default::default()
        });

        assert_eq!(query.lng, Some(2.0));
    }

    #[test]
    fn test_blank_filters_fall_back() {
        let query = ResourceSearchQuery::from(ResourceSearchParams {
            resource_type: Some(String::new()),
            status: Some(String::new()),
            radius: Some(5.0),
            ..Default::default()
        });

        assert_eq!(query.resource_type, None);
        assert_eq!(query.status, "active");
        assert_eq!(query.radius_km, 5.0);
    }

    #[test]
    fn test_create_request_reads_type_field() {
        let request: CreateResourceApiRequest = serde_json::from_value(serde_json::json!({
            "name": "Red Cross Shelter",
            "location_name": "Lower East Side, NYC",
            "type": "shelter",
            "capacity": 200
        }))
        .unwrap();

        let request = CreateResourceRequest::from(request);
        assert_eq!(request.resource_type, "shelter");
        assert_eq!(request.capacity, Some(200));
        assert!(request.services.is_empty());
    }
}
