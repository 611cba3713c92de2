//! Social media feed and citizen report endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, Query};
use crate::domain::priority::Priority;
use crate::infrastructure::services::{
    PriorityFeedResult, SocialFeedResult, SubmitReportRequest, SubmittedReport,
    DEFAULT_FEED_LIMIT,
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedParams {
    pub limit: Option<usize>,
    #[serde(default)]
    pub realtime: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitReportApiRequest {
    #[serde(default)]
    pub content: String,
    pub location: Option<String>,
    pub urgency: Option<String>,
    pub image_url: Option<String>,
}

impl TryFrom<SubmitReportApiRequest> for SubmitReportRequest {
    type Error = ApiError;

    fn try_from(request: SubmitReportApiRequest) -> Result<Self, Self::Error> {
        let urgency = request
            .urgency
            .filter(|u| !u.trim().is_empty())
            .map(|u| u.parse::<Priority>())
            .transpose()
            .map_err(|e| ApiError::bad_request(e).with_param("urgency"))?;

        Ok(Self {
            content: request.content,
            location: request.location,
            urgency,
            image_url: request.image_url,
        })
    }
}

/// GET /api/disasters/{id}/social-media
pub async fn social_feed(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
    Path(disaster_id): Path<String>,
    Query(params): Query<FeedParams>,
) -> Result<Json<SocialFeedResult>, ApiError> {
    let result = state
        .social_media_service
        .feed(
            &disaster_id,
            params.limit.unwrap_or(DEFAULT_FEED_LIMIT),
            params.realtime,
        )
        .await?;

    Ok(Json(result))
}

/// GET /api/disasters/{id}/social-media/priority
pub async fn priority_feed(
    State(state): State<AppState>,
    RequireUser(_): RequireUser,
    Path(disaster_id): Path<String>,
) -> Result<Json<PriorityFeedResult>, ApiError> {
    let result = state.social_media_service.priority(&disaster_id).await?;
    Ok(Json(result))
}

/// POST /api/disasters/{id}/social-media/report
pub async fn submit_report(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(disaster_id): Path<String>,
    Json(request): Json<SubmitReportApiRequest>,
) -> Result<(StatusCode, Json<SubmittedReport>), ApiError> {
    let submitted = state
        .social_media_service
        .submit_report(&disaster_id, request.try_into()?, &user)
        .await?;

    Ok((StatusCode::CREATED, Json(submitted)))
}
