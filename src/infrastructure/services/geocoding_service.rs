//! Geocoding service - cached location extraction and geocoding

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::cache::key::{geocode_key, location_extraction_key};
use crate::domain::cache::{CacheOutcome, CachePolicy};
use crate::domain::geo::GeoPoint;
use crate::domain::geocoding::{Geocoder, LocationExtractor};
use crate::domain::DomainError;
use crate::infrastructure::cache::CacheManager;

/// Extracted names are cached for an hour
pub const LOCATION_EXTRACTION_TTL_SECS: i64 = 3600;
/// Coordinates are cached for an hour
pub const GEOCODE_TTL_SECS: i64 = 3600;

/// Outcome of a text or name geocode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodeResult {
    pub original_description: Option<String>,
    pub extracted_location: Option<String>,
    pub coordinates: Option<GeoPoint>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Resolves free text and place names to coordinates through the cache
#[derive(Clone)]
pub struct GeocodingService {
    cache: Arc<CacheManager>,
    extractor: Arc<dyn LocationExtractor>,
    geocoder: Arc<dyn Geocoder>,
}

impl std::fmt::Debug for GeocodingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingService")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl GeocodingService {
    pub fn new(
        cache: Arc<CacheManager>,
        extractor: Arc<dyn LocationExtractor>,
        geocoder: Arc<dyn Geocoder>,
    ) -> Self {
        Self {
            cache,
            extractor,
            geocoder,
        }
    }

    /// Place name mentioned in `description`; only found names are cached
    pub async fn extract_location(&self, description: &str) -> Result<Option<String>, DomainError> {
        let key = location_extraction_key(description);

        let (location, outcome) = self
            .cache
            .fetch_through_optional(&key, CachePolicy::ttl(LOCATION_EXTRACTION_TTL_SECS), || {
                self.extractor.extract(description)
            })
            .await?;

        match (&location, outcome) {
            (Some(location), CacheOutcome::Hit) => {
                debug!(location = %location, "Using cached location extraction")
            }
            (Some(location), _) => info!(location = %location, "Location extracted from description"),
            (None, _) => debug!("No location found in description"),
        }

        Ok(location)
    }

    /// Coordinates for a place name
    pub async fn geocode(&self, location_name: &str) -> Result<GeoPoint, DomainError> {
        let key = geocode_key(location_name);

        let (point, outcome) = self
            .cache
            .fetch_through(&key, CachePolicy::ttl(GEOCODE_TTL_SECS), || {
                self.geocoder.geocode(location_name)
            })
            .await?;

        if outcome.is_hit() {
            debug!(location = %location_name, "Using cached geocoding");
        } else {
            info!(
                location = %location_name,
                lat = point.latitude,
                lng = point.longitude,
                "Location geocoded"
            );
        }

        Ok(point)
    }

    /// Geocodes `location_name`, or the place extracted from `description`
    pub async fn resolve(
        &self,
        description: Option<&str>,
        location_name: Option<&str>,
    ) -> Result<GeocodeResult, DomainError> {
        let description = description.filter(|d| !d.trim().is_empty());
        let location_name = location_name.filter(|n| !n.trim().is_empty());

        let extracted = match (location_name, description) {
            (Some(name), _) => Some(name.to_string()),
            (None, Some(description)) => self.extract_location(description).await?,
            (None, None) => {
                return Err(DomainError::validation(
                    "Either description or location_name is required",
                ));
            }
        };

        let coordinates = match &extracted {
            Some(name) => Some(self.geocode(name).await?),
            None => None,
        };

        let success = coordinates.is_some();

        Ok(GeocodeResult {
            original_description: description.map(str::to_string),
            extracted_location: extracted,
            coordinates,
            success,
            message: (!success).then(|| "Could not extract or geocode location".to_string()),
        })
    }
}
