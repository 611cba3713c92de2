//! Image verification endpoints

use axum::extract::{Path, State};
use serde::Deserialize;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Query};
use crate::infrastructure::services::{
    BatchVerifyResult, FlaggedResult, StatsResult, VerifyImageResult, DEFAULT_FLAGGED_LIMIT,
};

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyImageRequest {
    #[serde(default)]
    pub image_url: String,
    pub report_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchVerifyRequest {
    #[serde(default)]
    pub image_urls: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlaggedParams {
    pub limit: Option<usize>,
}

/// POST /api/disasters/{id}/verify-image
pub async fn verify_image(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(disaster_id): Path<String>,
    Json(request): Json<VerifyImageRequest>,
) -> Result<Json<VerifyImageResult>, ApiError> {
    let result = state
        .verification_service
        .verify(&disaster_id, &request.image_url, request.report_id, &user)
        .await?;

    Ok(Json(result))
}

/// POST /api/disasters/{id}/verify-image/batch
pub async fn verify_batch(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(disaster_id): Path<String>,
    Json(request): Json<BatchVerifyRequest>,
) -> Result<Json<BatchVerifyResult>, ApiError> {
    let result = state
        .verification_service
        .verify_batch(&disaster_id, &request.image_urls, &user)
        .await?;

    Ok(Json(result))
}

/// GET /api/disasters/{id}/verify-image/stats
pub async fn verification_stats(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
    Path(disaster_id): Path<String>,
) -> Result<Json<StatsResult>, ApiError> {
    let result = state.verification_service.stats(&disaster_id).await?;
    Ok(Json(result))
}

/// GET /api/disasters/{id}/verify-image/flagged
pub async fn flagged_images(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
    Path(disaster_id): Path<String>,
    Query(params): Query<FlaggedParams>,
) -> Result<Json<FlaggedResult>, ApiError> {
    let result = state
        .verification_service
        .flagged(&disaster_id, params.limit.unwrap_or(DEFAULT_FLAGGED_LIMIT))
        .await?;

    Ok(Json(result))
}
