//! Official updates service - cached agency updates and scraping

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::domain::cache::key::{official_updates_key, official_updates_prefix};
use crate::domain::cache::{CacheOutcome, CachePolicy};
use crate::domain::update::{sort_by_priority, SourceKind};
use crate::domain::{DomainError, OfficialUpdate, Priority, UpdateCatalog, UpdateScraper};
use crate::infrastructure::cache::CacheManager;

use super::DisasterService;

pub const UPDATES_TTL_SECS: i64 = 1800;
/// Scraped results go stale faster
pub const FRESH_UPDATES_TTL_SECS: i64 = 600;
pub const DEFAULT_UPDATES_LIMIT: usize = 20;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdatesQuery {
    pub limit: usize,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub fresh: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateFilters {
    pub priority: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdatesResult {
    pub disaster_id: String,
    pub updates: Vec<OfficialUpdate>,
    pub count: usize,
    pub filters: UpdateFilters,
    pub fresh_data: bool,
    pub cache: CacheOutcome,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceSummary {
    pub name: String,
    pub description: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub update_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourcesResult {
    pub disaster_id: String,
    pub sources: Vec<SourceSummary>,
    pub total_sources: usize,
    pub total_updates: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshResult {
    pub disaster_id: String,
    pub message: &'static str,
    pub new_updates_count: usize,
    pub refreshed_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct OfficialUpdatesService {
    disasters: Arc<DisasterService>,
    catalog: Arc<dyn UpdateCatalog>,
    scraper: Arc<dyn UpdateScraper>,
    cache: Arc<CacheManager>,
}

impl std::fmt::Debug for OfficialUpdatesService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfficialUpdatesService")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl OfficialUpdatesService {
    pub fn new(
        disasters: Arc<DisasterService>,
        catalog: Arc<dyn UpdateCatalog>,
        scraper: Arc<dyn UpdateScraper>,
        cache: Arc<CacheManager>,
    ) -> Self {
        Self {
            disasters,
            catalog,
            scraper,
            cache,
        }
    }

    /// Updates relevant to the disaster, most important first
    pub async fn list(
        &self,
        disaster_id: &str,
        query: &UpdatesQuery,
    ) -> Result<UpdatesResult, DomainError> {
        let disaster = self.disasters.get_required(disaster_id).await?;

        let key = official_updates_key(
            disaster_id,
            query.priority.as_deref(),
            query.category.as_deref(),
            query.limit,
        );
        let policy = if query.fresh {
            CachePolicy::ttl(FRESH_UPDATES_TTL_SECS).with_bypass_read(true)
        } else {
            CachePolicy::ttl(UPDATES_TTL_SECS)
        };

        let (updates, outcome) = self
            .cache
            .fetch_through(&key, policy, || async {
                let mut updates = self.catalog.updates().await?;

                if query.fresh {
                    let scraped = self.scrape_all(&disaster.tags).await;
                    info!(
                        disaster_id = %disaster_id,
                        count = scraped.len(),
                        "Scraped fresh updates"
                    );
                    updates.splice(0..0, scraped);
                }

                updates.retain(|u| {
                    query
                        .priority
                        .as_deref()
                        .is_none_or(|p| u.priority.as_str() == p)
                        && query.category.as_deref().is_none_or(|c| u.category == c)
                        && u.matches_tags(&disaster.tags)
                });
                sort_by_priority(&mut updates);
                updates.truncate(query.limit);

                Ok(updates)
            })
            .await?;

        if outcome.is_hit() {
            debug!(disaster_id = %disaster_id, "Using cached official updates");
        } else {
            info!(disaster_id = %disaster_id, count = updates.len(), "Retrieved official updates");
        }

        Ok(UpdatesResult {
            disaster_id: disaster_id.to_string(),
            count: updates.len(),
            updates,
            filters: UpdateFilters {
                priority: query.priority.clone(),
                category: query.category.clone(),
            },
            fresh_data: query.fresh,
            cache: outcome,
            last_updated: Utc::now(),
        })
    }

    /// Monitored agencies with how many curated updates each published
    pub async fn sources(&self, disaster_id: &str) -> Result<SourcesResult, DomainError> {
        self.disasters.get_required(disaster_id).await?;

        let updates = self.catalog.updates().await?;
        let sources: Vec<SourceSummary> = self
            .catalog
            .sources()
            .into_iter()
            .map(|source| SourceSummary {
                update_count: updates.iter().filter(|u| u.source == source.name).count(),
                name: source.name,
                description: source.description,
                url: source.url,
                kind: source.kind,
            })
            .collect();

        Ok(SourcesResult {
            disaster_id: disaster_id.to_string(),
            total_sources: sources.len(),
            sources,
            total_updates: updates.len(),
        })
    }

    /// Drops every cached update list for the disaster and scrapes again
    pub async fn refresh(&self, disaster_id: &str) -> Result<RefreshResult, DomainError> {
        let disaster = self.disasters.get_required(disaster_id).await?;

        self.cache
            .delete_prefix(&official_updates_prefix(disaster_id))
            .await;

        let scraped = self.scrape_all(&disaster.tags).await;
        info!(
            disaster_id = %disaster_id,
            count = scraped.len(),
            "Refreshed official updates"
        );

        Ok(RefreshResult {
            disaster_id: disaster_id.to_string(),
            message: "Official updates refreshed successfully",
            new_updates_count: scraped.len(),
            refreshed_at: Utc::now(),
        })
    }

    /// Scrapes every target; a failing source is logged and skipped
    async fn scrape_all(&self, tags: &[String]) -> Vec<OfficialUpdate> {
        let stamp = Utc::now().timestamp_millis();
        let mut updates = Vec::new();

        for source in self.catalog.scrape_targets() {
            let items = match self.scraper.scrape(&source).await {
                Ok(items) => items,
                Err(e) => {
                    error!(source = %source.name, error = %e, "Error scraping source");
                    continue;
                }
            };

            let slug = source
                .name
                .to_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("_");

            updates.extend(items.into_iter().enumerate().map(|(i, item)| OfficialUpdate {
                id: format!("scraped_{}_{}_{}", slug, stamp, i),
                source: source.name.clone(),
                title: item.title,
                content: item.content,
                url: source.url.clone(),
                published_at: item.published_at,
                priority: Priority::Medium,
                category: "official".to_string(),
                tags: tags.to_vec(),
                is_scraped: true,
            }));
        }

        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geocoding::{MockGeocoder, MockLocationExtractor};
    use crate::domain::storage::mock::MockStorage;
    use crate::domain::update::{MockUpdateScraper, ScrapedItem, UpdateSource};
    use crate::domain::Disaster;
    use crate::infrastructure::cache::InMemoryCacheStore;
    use crate::infrastructure::events::EventBroadcaster;
    use crate::infrastructure::services::GeocodingService;
    use crate::infrastructure::updates::{SimulatedAgencyScraper, StaticUpdateCatalog};

    fn service_with(
        tags: &[&str],
        scraper: Arc<dyn UpdateScraper>,
    ) -> (OfficialUpdatesService, Arc<CacheManager>, String) {
        let disaster = Disaster::new("NYC Flood", "Heavy flooding", "netrunnerX")
            .with_tags(tags.iter().map(|t| t.to_string()).collect());
        let disaster_id = disaster.id.clone();

        let cache = Arc::new(CacheManager::new(Arc::new(InMemoryCacheStore::new())));
        let geocoding = Arc::new(GeocodingService::new(
            cache.clone(),
            Arc::new(MockLocationExtractor::new()),
            Arc::new(MockGeocoder::new()),
        ));
        let disasters = Arc::new(DisasterService::new(
            Arc::new(MockStorage::new().with_record(disaster)),
            geocoding,
            EventBroadcaster::new(),
        ));

        (
            OfficialUpdatesService::new(
                disasters,
                Arc::new(StaticUpdateCatalog::new()),
                scraper,
                cache.clone(),
            ),
            cache,
            disaster_id,
        )
    }

    fn query() -> UpdatesQuery {
        UpdatesQuery {
            limit: DEFAULT_UPDATES_LIMIT,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_list_filters_by_tags_and_sorts_by_priority() {
        let (service, _, id) = service_with(&["flood"], Arc::new(SimulatedAgencyScraper::new()));

        let result = service.list(&id, &query()).await.unwrap();

        let ids: Vec<_> = result.updates.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["update_2", "update_1", "update_4"]);
        assert_eq!(result.cache, CacheOutcome::Miss);

        let cached = service.list(&id, &query()).await.unwrap();
        assert_eq!(cached.cache, CacheOutcome::Hit);
    }

    #[tokio::test]
    async fn test_list_priority_and_category_filters() {
        let (service, _, id) = service_with(&[], Arc::new(SimulatedAgencyScraper::new()));

        let critical = service
            .list(
                &id,
                &UpdatesQuery {
                    priority: Some("critical".to_string()),
                    ..query()
                },
            )
            .await
            .unwrap();
        assert_eq!(critical.count, 1);
        assert_eq!(critical.updates[0].id, "update_2");

        let shelter = service
            .list(
                &id,
                &UpdatesQuery {
                    category: Some("shelter".to_string()),
                    ..query()
                },
            )
            .await
            .unwrap();
        assert_eq!(shelter.count, 1);
        assert_eq!(shelter.updates[0].source, "American Red Cross");
    }

    #[tokio::test]
    async fn test_fresh_list_prepends_scraped_updates() {
        let (service, _, id) = service_with(&[], Arc::new(SimulatedAgencyScraper::new()));

        let fresh = service
            .list(
                &id,
                &UpdatesQuery {
                    fresh: true,
                    ..query()
                },
            )
            .await
            .unwrap();

        assert_eq!(fresh.cache, CacheOutcome::Bypassed);
        assert!(fresh.fresh_data);
        let scraped: Vec<_> = fresh.updates.iter().filter(|u| u.is_scraped).collect();
        assert!(!scraped.is_empty());
        assert!(scraped.iter().all(|u| u.id.starts_with("scraped_")));
    }

    #[tokio::test]
    async fn test_failing_source_is_skipped() {
        let mut scraper = MockUpdateScraper::new();
        scraper
            .expect_scrape()
            .returning(|source: &UpdateSource| {
                if source.name == "FEMA" {
                    Err(DomainError::provider("FEMA", "timeout"))
                } else {
                    Ok(vec![ScrapedItem {
                        title: "Update".to_string(),
                        content: "Body".to_string(),
                        published_at: Utc::now(),
                    }])
                }
            });

        let (service, _, id) = service_with(&["flood"], Arc::new(scraper));

        let result = service.refresh(&id).await.unwrap();
        let targets = StaticUpdateCatalog::new().scrape_targets().len();
        assert_eq!(result.new_updates_count, targets - 1);
    }

    #[tokio::test]
    async fn test_refresh_invalidates_every_cached_list() {
        let (service, cache, id) = service_with(&[], Arc::new(SimulatedAgencyScraper::new()));

        service.list(&id, &query()).await.unwrap();
        service
            .list(
                &id,
                &UpdatesQuery {
                    priority: Some("medium".to_string()),
                    limit: 5,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cache.stats().await.entries, Some(2));

        service.refresh(&id).await.unwrap();
        assert_eq!(cache.stats().await.entries, Some(0));

        let again = service.list(&id, &query()).await.unwrap();
        assert_eq!(again.cache, CacheOutcome::Miss);
    }

    #[tokio::test]
    async fn test_sources_with_counts() {
        let (service, _, id) = service_with(&[], Arc::new(SimulatedAgencyScraper::new()));

        let result = service.sources(&id).await.unwrap();

        assert_eq!(result.total_sources, 5);
        assert_eq!(result.total_updates, 5);
        assert!(result.sources.iter().all(|s| s.update_count == 1));
    }
}
