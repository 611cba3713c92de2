//! Update scraping and catalog traits

use async_trait::async_trait;

use super::{OfficialUpdate, ScrapedItem, UpdateSource};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Pulls recent items from an agency website
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UpdateScraper: Send + Sync {
    async fn scrape(&self, source: &UpdateSource) -> Result<Vec<ScrapedItem>, DomainError>;
}

/// Curated updates and the list of monitored sources
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UpdateCatalog: Send + Sync {
    async fn updates(&self) -> Result<Vec<OfficialUpdate>, DomainError>;

    /// Agencies listed to clients
    fn sources(&self) -> Vec<UpdateSource>;

    /// Agency pages polled when fresh updates are requested
    fn scrape_targets(&self) -> Vec<UpdateSource>;
}
