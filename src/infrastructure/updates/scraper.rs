//! Simulated agency website scraper

use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::Url;
use tracing::debug;

use crate::domain::update::{ScrapedItem, UpdateScraper, UpdateSource};
use crate::domain::DomainError;

/// Returns canned items keyed by the source's domain
#[derive(Debug, Default, Clone)]
pub struct SimulatedAgencyScraper;

impl SimulatedAgencyScraper {
    pub fn new() -> Self {
        Self
    }

    /// Host name without a leading `www.`/`www1.`
    fn domain(url: &str) -> Result<String, DomainError> {
        let url = Url::parse(url)
            .map_err(|e| DomainError::validation(format!("Invalid source URL '{}': {}", url, e)))?;

        let host = url
            .host_str()
            .ok_or_else(|| DomainError::validation(format!("Source URL '{}' has no host", url)))?;

        Ok(host.replacen("www.", "", 1).replacen("www1.", "", 1))
    }

    fn item(title: &str, content: &str, minutes_ago: i64) -> ScrapedItem {
        ScrapedItem {
            title: title.to_string(),
            content: content.to_string(),
            published_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }
}

#[async_trait]
impl UpdateScraper for SimulatedAgencyScraper {
    async fn scrape(&self, source: &UpdateSource) -> Result<Vec<ScrapedItem>, DomainError> {
        let domain = Self::domain(&source.url)?;

        let items = match domain.as_str() {
            "fema.gov" => vec![Self::item(
                "Disaster Relief Funding Available",
                "Additional federal funding has been allocated for disaster relief efforts in affected areas.",
                15,
            )],
            "nyc.gov" => vec![Self::item(
                "City Services Update",
                "Essential city services continue to operate. Non-essential services may be limited during the emergency.",
                20,
            )],
            "redcross.org" => vec![Self::item(
                "Volunteer Opportunities",
                "The Red Cross is seeking volunteers to assist with disaster relief efforts. Training provided.",
                25,
            )],
            _ => Vec::new(),
        };

        debug!(source = %source.name, domain = %domain, items = items.len(), "Scraped source");
        Ok(items)
    }
}
