//! Geocoding domain - place-name extraction and coordinate lookup

use async_trait::async_trait;

use crate::domain::geo::GeoPoint;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Pulls a place name out of free text
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LocationExtractor: Send + Sync {
    /// `None` when the text names no recognisable place
    async fn extract(&self, description: &str) -> Result<Option<String>, DomainError>;
}

/// Resolves a place name to coordinates
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, location_name: &str) -> Result<GeoPoint, DomainError>;
}
