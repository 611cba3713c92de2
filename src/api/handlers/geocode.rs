//! Location extraction and geocoding endpoints

use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::geo::GeoPoint;
use crate::infrastructure::services::GeocodeResult;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeRequest {
    pub description: Option<String>,
    pub location_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationGeocodeResponse {
    pub location_name: String,
    pub coordinates: Option<GeoPoint>,
    pub success: bool,
}

/// POST /api/geocode
pub async fn geocode(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
    Json(request): Json<GeocodeRequest>,
) -> Result<Json<GeocodeResult>, ApiError> {
    let result = state
        .geocoding_service
        .resolve(request.description.as_deref(), request.location_name.as_deref())
        .await?;

    Ok(Json(result))
}

/// GET /api/geocode/location/{name}
///
/// A failed lookup is reported in the body rather than as an error status.
pub async fn geocode_location(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
    Path(name): Path<String>,
) -> Result<Json<LocationGeocodeResponse>, ApiError> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::bad_request("Location name is required").with_param("name"));
    }

    let coordinates = match state.geocoding_service.geocode(&name).await {
        Ok(point) => Some(point),
        Err(e) => {
            debug!(location = %name, error = %e, "Direct geocoding failed");
            None
        }
    };

    Ok(Json(LocationGeocodeResponse {
        success: coordinates.is_some(),
        location_name: name,
        coordinates,
    }))
}
