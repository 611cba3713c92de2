//! Infrastructure services

mod disaster_service;
mod geocoding_service;
mod official_updates_service;
mod resource_service;
mod social_media_service;
mod verification_service;

pub use disaster_service::{CreateDisasterRequest, DisasterFilter, DisasterService};
pub use geocoding_service::{GeocodeResult, GeocodingService};
pub use official_updates_service::{
    OfficialUpdatesService, RefreshResult, SourcesResult, UpdatesQuery, UpdatesResult,
    DEFAULT_UPDATES_LIMIT,
};
pub use resource_service::{
    CreateResourceRequest, ResourceSearchQuery, ResourceSearchResult, ResourceService,
    ResourceTypeCounts, DEFAULT_RADIUS_KM, DEFAULT_STATUS,
};
pub use social_media_service::{
    PriorityFeedResult, SocialFeedResult, SocialMediaService, SubmitReportRequest,
    SubmittedReport, DEFAULT_FEED_LIMIT,
};
pub use verification_service::{
    BatchVerifyResult, FlaggedResult, StatsResult, VerificationService, VerifyImageResult,
    DEFAULT_FLAGGED_LIMIT,
};
