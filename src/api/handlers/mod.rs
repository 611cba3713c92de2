//! REST endpoints under `/api`

pub mod cache;
pub mod disasters;
pub mod geocode;
pub mod official_updates;
pub mod realtime;
pub mod resources;
pub mod social_media;
pub mod verification;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::state::AppState;

/// Create the `/api` router
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        // Disasters
        .route(
            "/disasters",
            get(disasters::list_disasters).post(disasters::create_disaster),
        )
        .route(
            "/disasters/{id}",
            get(disasters::get_disaster)
                .put(disasters::update_disaster)
                .delete(disasters::delete_disaster),
        )
        // Resources
        .route(
            "/disasters/{id}/resources",
            get(resources::search_resources).post(resources::create_resource),
        )
        .route("/disasters/{id}/resources/types", get(resources::resource_types))
        .route(
            "/disasters/{id}/resources/{resource_id}",
            put(resources::update_resource),
        )
        // Social media
        .route("/disasters/{id}/social-media", get(social_media::social_feed))
        .route(
            "/disasters/{id}/social-media/priority",
            get(social_media::priority_feed),
        )
        .route(
            "/disasters/{id}/social-media/report",
            post(social_media::submit_report),
        )
        // Official updates
        .route(
            "/disasters/{id}/official-updates",
            get(official_updates::list_updates),
        )
        .route(
            "/disasters/{id}/official-updates/sources",
            get(official_updates::list_sources),
        )
        .route(
            "/disasters/{id}/official-updates/refresh",
            post(official_updates::refresh_updates),
        )
        // Image verification
        .route("/disasters/{id}/verify-image", post(verification::verify_image))
        .route(
            "/disasters/{id}/verify-image/batch",
            post(verification::verify_batch),
        )
        .route(
            "/disasters/{id}/verify-image/stats",
            get(verification::verification_stats),
        )
        .route(
            "/disasters/{id}/verify-image/flagged",
            get(verification::flagged_images),
        )
        // Geocoding
        .route("/geocode", post(geocode::geocode))
        .route("/geocode/location/{name}", get(geocode::geocode_location))
        // Cache administration
        .route("/cache", delete(cache::clear_cache))
        .route("/cache/stats", get(cache::cache_stats))
        .route("/cache/cleanup", post(cache::cleanup_cache))
        .route("/cache/{key}", delete(cache::delete_cache_key))
}
