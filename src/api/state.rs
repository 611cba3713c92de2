//! Application state shared by all handlers

use std::sync::Arc;

use crate::domain::user::UserDirectory;
use crate::infrastructure::cache::CacheManager;
use crate::infrastructure::events::EventBroadcaster;
use crate::infrastructure::rate_limit::RateLimiter;
use crate::infrastructure::services::{
    DisasterService, GeocodingService, OfficialUpdatesService, ResourceService,
    SocialMediaService, VerificationService,
};

/// Application state containing the cache and every service
///
/// Built once at start-up and cloned into each request.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<CacheManager>,
    pub disaster_service: Arc<DisasterService>,
    pub resource_service: Arc<ResourceService>,
    pub social_media_service: Arc<SocialMediaService>,
    pub official_updates_service: Arc<OfficialUpdatesService>,
    pub verification_service: Arc<VerificationService>,
    pub geocoding_service: Arc<GeocodingService>,
    pub user_directory: Arc<dyn UserDirectory>,
    pub events: EventBroadcaster,
    /// `None` when rate limiting is disabled
    pub rate_limiter: Option<Arc<RateLimiter>>,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cache: Arc<CacheManager>,
        disaster_service: Arc<DisasterService>,
        resource_service: Arc<ResourceService>,
        social_media_service: Arc<SocialMediaService>,
        official_updates_service: Arc<OfficialUpdatesService>,
        verification_service: Arc<VerificationService>,
        geocoding_service: Arc<GeocodingService>,
        user_directory: Arc<dyn UserDirectory>,
        events: EventBroadcaster,
    ) -> Self {
        Self {
            cache,
            disaster_service,
            resource_service,
            social_media_service,
            official_updates_service,
            verification_service,
            geocoding_service,
            user_directory,
            events,
            rate_limiter: None,
        }
    }

    pub fn with_rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("cache", &self.cache)
            .field("events", &self.events)
            .field("rate_limited", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}
