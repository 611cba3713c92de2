//! Disaster Response API
//!
//! Coordinates disaster records, nearby resources, social media reports,
//! official updates and image verification. External lookups are answered
//! through a TTL cache kept on persistent storage, and nearby resources are
//! ranked by great-circle distance.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPool;
use tracing::{info, warn};

use api::state::AppState;
use domain::storage::Storage;
use domain::{Disaster, Report, Resource, VerificationRecord};
use infrastructure::{
    cache::{CacheBackend, CacheFactory, CacheManager, CacheStoreConfig},
    events::EventBroadcaster,
    geocoding::{PatternLocationExtractor, TableGeocoder},
    rate_limit::{RateLimitPolicy, RateLimiter},
    resource::seed_resources,
    services::{
        DisasterService, GeocodingService, OfficialUpdatesService, ResourceService,
        SocialMediaService, VerificationService,
    },
    social::SimulatedSocialFeed,
    storage::{connect_pool, run_storage_migrations, PostgresConfig, StorageBackend, StorageFactory},
    updates::{SimulatedAgencyScraper, StaticUpdateCatalog},
    user::InMemoryUserDirectory,
    verification::SimulatedImageVerifier,
};

/// Create the application state with all services initialized
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let pool = connect_database(config).await?;
    let cache = create_cache_manager(config, pool.as_ref())?;

    let storage_backend = StorageBackend::from_str(&config.storage.backend)?;
    info!(backend = %storage_backend, "Storage backend selected");

    let disasters = StorageFactory::create::<Disaster>(storage_backend, pool.as_ref())?;
    let resources = StorageFactory::create::<Resource>(storage_backend, pool.as_ref())?;
    let reports = StorageFactory::create::<Report>(storage_backend, pool.as_ref())?;
    let verifications =
        StorageFactory::create::<VerificationRecord>(storage_backend, pool.as_ref())?;

    seed_resource_catalog(resources.as_ref()).await?;

    let events = EventBroadcaster::with_capacity(config.realtime.channel_capacity);

    let geocoding_service = Arc::new(GeocodingService::new(
        cache.clone(),
        Arc::new(PatternLocationExtractor::new()),
        Arc::new(TableGeocoder::new()),
    ));

    let disaster_service = Arc::new(DisasterService::new(
        disasters,
        geocoding_service.clone(),
        events.clone(),
    ));

    let resource_service = Arc::new(ResourceService::new(
        resources,
        disaster_service.clone(),
        geocoding_service.clone(),
        cache.clone(),
        events.clone(),
    ));

    let social_media_service = Arc::new(SocialMediaService::new(
        reports.clone(),
        disaster_service.clone(),
        Arc::new(SimulatedSocialFeed::new()),
        cache.clone(),
        events.clone(),
    ));

    let official_updates_service = Arc::new(OfficialUpdatesService::new(
        disaster_service.clone(),
        Arc::new(StaticUpdateCatalog::new()),
        Arc::new(SimulatedAgencyScraper::new()),
        cache.clone(),
    ));

    let verification_service = Arc::new(VerificationService::new(
        verifications,
        reports,
        disaster_service.clone(),
        Arc::new(SimulatedImageVerifier::new()),
        cache.clone(),
    ));

    let mut state = AppState::new(
        cache,
        disaster_service,
        resource_service,
        social_media_service,
        official_updates_service,
        verification_service,
        geocoding_service,
        Arc::new(InMemoryUserDirectory::seeded()),
        events,
    );

    if config.rate_limit.enabled {
        let policy = RateLimitPolicy::new(
            config.rate_limit.max_requests,
            Duration::from_secs(config.rate_limit.window_secs),
        );
        info!(
            max_requests = policy.max_requests,
            window_secs = config.rate_limit.window_secs,
            "Rate limiting enabled"
        );
        state = state.with_rate_limiter(Arc::new(RateLimiter::new(policy)));
    }

    Ok(state)
}

/// Opens the pool and runs migrations when any backend lives in PostgreSQL
pub async fn connect_database(config: &AppConfig) -> anyhow::Result<Option<PgPool>> {
    if !config.needs_database() {
        return Ok(None);
    }

    info!("Connecting to PostgreSQL...");
    let pg_config = PostgresConfig::new(&config.database.url)
        .with_max_connections(config.database.max_connections)
        .with_min_connections(config.database.min_connections)
        .with_connect_timeout(config.database.connect_timeout_secs);

    let pool = connect_pool(&pg_config).await?;
    run_storage_migrations(&pool).await?;
    info!("PostgreSQL connection established");

    Ok(Some(pool))
}

/// Builds the cache for the configured backend
pub fn create_cache_manager(
    config: &AppConfig,
    pool: Option<&PgPool>,
) -> anyhow::Result<Arc<CacheManager>> {
    let store_config = CacheStoreConfig {
        backend: CacheBackend::from_str(&config.cache.backend)?,
        default_ttl_secs: config.cache.default_ttl_secs,
        max_capacity: config.cache.max_capacity,
    };

    let store = CacheFactory::create(&store_config, pool)?;
    let manager = CacheManager::new(store).with_default_ttl(store_config.default_ttl_secs);

    info!(
        backend = manager.backend_name(),
        default_ttl_secs = manager.default_ttl_secs(),
        "Cache initialized"
    );

    Ok(Arc::new(manager))
}

/// Loads the built-in resource catalog into empty resource storage
async fn seed_resource_catalog(storage: &dyn Storage<Resource>) -> anyhow::Result<()> {
    if storage.count().await? > 0 {
        return Ok(());
    }

    let catalog = seed_resources();
    let total = catalog.len();

    for resource in catalog {
        if let Err(e) = storage.insert(resource).await {
            warn!(error = %e, "Failed to seed catalog resource");
        }
    }

    info!(resources = total, "Resource catalog seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_state_is_in_memory() {
        let state = create_app_state(&AppConfig::default()).await.unwrap();

        assert_eq!(state.cache.backend_name(), "in_memory");
        assert_eq!(state.cache.default_ttl_secs(), 3600);
        assert!(state.rate_limiter.is_some());
    }

    #[tokio::test]
    async fn test_unknown_backend_is_rejected() {
        let mut config = AppConfig::default();
        config.cache.backend = "redis".to_string();

        assert!(create_app_state(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_rate_limiter_can_be_disabled() {
        let mut config = AppConfig::default();
        config.rate_limit.enabled = false;

        let state = create_app_state(&config).await.unwrap();
        assert!(state.rate_limiter.is_none());
    }

    #[tokio::test]
    async fn test_catalog_is_seeded_once() {
        let storage = StorageFactory::create::<Resource>(StorageBackend::InMemory, None).unwrap();

        seed_resource_catalog(storage.as_ref()).await.unwrap();
        let seeded = storage.count().await.unwrap();
        seed_resource_catalog(storage.as_ref()).await.unwrap();

        assert!(seeded > 0);
        assert_eq!(storage.count().await.unwrap(), seeded);
    }
}
