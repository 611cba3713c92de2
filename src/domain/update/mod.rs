//! Official updates domain

mod entity;
mod scraper;

pub use entity::{sort_by_priority, OfficialUpdate, ScrapedItem, SourceKind, UpdateSource};
pub use scraper::{UpdateCatalog, UpdateScraper};

#[cfg(test)]
pub use scraper::{MockUpdateCatalog, MockUpdateScraper};
