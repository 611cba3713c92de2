//! Official updates infrastructure

mod catalog;
mod scraper;

pub use catalog::StaticUpdateCatalog;
pub use scraper::SimulatedAgencyScraper;
