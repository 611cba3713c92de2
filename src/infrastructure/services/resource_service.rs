//! Resource service - cached radius search and resource CRUD

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::cache::key::{resources_key, resources_prefix, ResourceQueryKey};
use crate::domain::cache::{CacheOutcome, CachePolicy};
use crate::domain::events::ResourcesUpdate;
use crate::domain::resource::ResourceChanges;
use crate::domain::storage::Storage;
use crate::domain::{
    filter_by_radius, AuditAction, DomainError, GeoPoint, RealtimeEvent, Ranked, Resource,
    ResourceType, User,
};
use crate::infrastructure::cache::CacheManager;
use crate::infrastructure::events::EventBroadcaster;

use super::{DisasterService, GeocodingService};

/// Search results are cached for 30 minutes
pub const RESOURCE_SEARCH_TTL_SECS: i64 = 1800;
pub const DEFAULT_RADIUS_KM: f64 = 10.0;
pub const DEFAULT_STATUS: &str = "active";

/// Radius search parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSearchQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius_km: f64,
    pub resource_type: Option<String>,
    pub status: String,
}

impl Default for ResourceSearchQuery {
    fn default() -> Self {
        Self {
            lat: None,
            lng: None,
            radius_km: DEFAULT_RADIUS_KM,
            resource_type: None,
            status: DEFAULT_STATUS.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceFilters {
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub status: String,
}

/// Resources near a disaster, nearest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceSearchResult {
    pub disaster_id: String,
    pub search_location: GeoPoint,
    pub radius: f64,
    pub resources: Vec<Ranked<Resource>>,
    pub count: usize,
    pub filters: ResourceFilters,
    pub cache: CacheOutcome,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceTypeSummary {
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceTypeCounts {
    pub disaster_id: String,
    pub resource_types: Vec<ResourceTypeSummary>,
    pub total_resources: usize,
}

/// Request to create a resource for a disaster
#[derive(Debug, Clone, Default)]
pub struct CreateResourceRequest {
    pub name: String,
    pub location_name: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub resource_type: String,
    pub capacity: Option<u32>,
    pub contact: Option<String>,
    pub services: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ResourceService {
    storage: Arc<dyn Storage<Resource>>,
    disasters: Arc<DisasterService>,
    geocoding: Arc<GeocodingService>,
    cache: Arc<CacheManager>,
    events: EventBroadcaster,
}

impl ResourceService {
    pub fn new(
        storage: Arc<dyn Storage<Resource>>,
        disasters: Arc<DisasterService>,
        geocoding: Arc<GeocodingService>,
        cache: Arc<CacheManager>,
        events: EventBroadcaster,
    ) -> Self {
        Self {
            storage,
            disasters,
            geocoding,
            cache,
            events,
        }
    }

    /// Resources within the radius of the query point or the disaster
    pub async fn search(
        &self,
        disaster_id: &str,
        query: &ResourceSearchQuery,
    ) -> Result<ResourceSearchResult, DomainError> {
        let disaster = self.disasters.get_required(disaster_id).await?;

        let reference = match (query.lat, query.lng, disaster.location) {
            (Some(lat), Some(lng), _) => GeoPoint {
                latitude: lat,
                longitude: lng,
            },
            (_, _, Some(location)) => location,
            _ => {
                warn!(disaster_id = %disaster_id, "No location data for disaster, using NYC center");
                GeoPoint::NEW_YORK
            }
        };

        let key = resources_key(&ResourceQueryKey {
            disaster_id,
            lat: reference.latitude,
            lng: reference.longitude,
            radius_km: query.radius_km,
            resource_type: query.resource_type.as_deref(),
            status: &query.status,
        });

        let (resources, outcome) = self
            .cache
            .fetch_through(&key, CachePolicy::ttl(RESOURCE_SEARCH_TTL_SECS), || async {
                let candidates = self
                    .storage
                    .find(&|r: &Resource| {
                        r.is_visible_to(disaster_id)
                            && r.status.as_str() == query.status
                            && query
                                .resource_type
                                .as_deref()
                                .is_none_or(|t| r.resource_type.as_str() == t)
                    })
                    .await?;

                Ok(filter_by_radius(
                    &candidates,
                    reference.latitude,
                    reference.longitude,
                    query.radius_km,
                ))
            })
            .await?;

        if outcome.is_hit() {
            debug!(disaster_id = %disaster_id, "Using cached resources");
        } else {
            info!(
                disaster_id = %disaster_id,
                count = resources.len(),
                "Found resources near disaster"
            );
        }

        self.events.send(RealtimeEvent::ResourcesUpdated(ResourcesUpdate::search(
            disaster_id,
            resources.clone(),
            reference,
            query.radius_km,
        )));

        Ok(ResourceSearchResult {
            disaster_id: disaster_id.to_string(),
            search_location: reference,
            radius: query.radius_km,
            count: resources.len(),
            resources,
            filters: ResourceFilters {
                resource_type: query.resource_type.clone(),
                status: query.status.clone(),
            },
            cache: outcome,
            last_updated: Utc::now(),
        })
    }

    /// Built-in resource kinds with how many visible resources each has
    pub async fn types(&self, disaster_id: &str) -> Result<ResourceTypeCounts, DomainError> {
        self.disasters.get_required(disaster_id).await?;

        let visible = self
            .storage
            .find(&|r: &Resource| r.is_visible_to(disaster_id))
            .await?;

        let resource_types = ResourceType::KNOWN
            .iter()
            .filter_map(|kind| {
                let (name, description, icon) = kind.descriptor()?;
                Some(ResourceTypeSummary {
                    resource_type: kind.clone(),
                    name,
                    description,
                    icon,
                    count: visible.iter().filter(|r| &r.resource_type == kind).count(),
                })
            })
            .collect();

        Ok(ResourceTypeCounts {
            disaster_id: disaster_id.to_string(),
            resource_types,
            total_resources: visible.len(),
        })
    }

    pub async fn create(
        &self,
        disaster_id: &str,
        request: CreateResourceRequest,
        user: &User,
    ) -> Result<Resource, DomainError> {
        if request.name.trim().is_empty()
            || request.location_name.trim().is_empty()
            || request.resource_type.trim().is_empty()
        {
            return Err(DomainError::validation(
                "Missing required fields: name, location_name, type",
            ));
        }

        self.disasters.get_required(disaster_id).await?;

        let location = match (request.lat, request.lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)?),
            _ => self.locate(&request.location_name).await,
        };

        let mut resource = Resource::new(
            request.name,
            request.location_name,
            ResourceType::from(request.resource_type),
        )
        .for_disaster(disaster_id);
        resource.location = location;
        resource.capacity = request.capacity;
        resource.contact = request.contact;
        resource.services = request.services;

        let resource = self.storage.insert(resource).await?;
        info!(
            resource_id = %resource.id,
            disaster_id = %disaster_id,
            user_id = %user.id,
            "Resource created"
        );

        self.invalidate(disaster_id).await;
        self.events.send(RealtimeEvent::ResourcesUpdated(ResourcesUpdate::changed(
            disaster_id,
            AuditAction::Create,
            resource.clone(),
        )));

        Ok(resource)
    }

    /// Only resources created for this disaster can be updated through it
    pub async fn update(
        &self,
        disaster_id: &str,
        resource_id: &str,
        changes: ResourceChanges,
        user: &User,
    ) -> Result<Resource, DomainError> {
        let mut resource = self
            .storage
            .get(resource_id)
            .await?
            .filter(|r| r.disaster_id.as_deref() == Some(disaster_id))
            .ok_or_else(|| DomainError::not_found("Resource not found"))?;

        if let Some(name) = changes.name {
            resource.name = name;
        }
        if let Some(location_name) = changes.location_name {
            resource.location_name = location_name;
        }
        if let (Some(lat), Some(lng)) = (changes.lat, changes.lng) {
            resource.location = Some(GeoPoint::new(lat, lng)?);
        }
        if let Some(resource_type) = changes.resource_type {
            resource.resource_type = resource_type;
        }
        if let Some(capacity) = changes.capacity {
            resource.capacity = Some(capacity);
        }
        if let Some(occupancy) = changes.current_occupancy {
            resource.current_occupancy = Some(occupancy);
        }
        if let Some(contact) = changes.contact {
            resource.contact = Some(contact);
        }
        if let Some(status) = changes.status {
            resource.status = status;
        }
        if let Some(services) = changes.services {
            resource.services = services;
        }

        let resource = self.storage.replace(resource).await?;
        info!(
            resource_id = %resource_id,
            disaster_id = %disaster_id,
            user_id = %user.id,
            "Resource updated"
        );

        self.invalidate(disaster_id).await;
        self.events.send(RealtimeEvent::ResourcesUpdated(ResourcesUpdate::changed(
            disaster_id,
            AuditAction::Update,
            resource.clone(),
        )));

        Ok(resource)
    }

    async fn invalidate(&self, disaster_id: &str) {
        self.cache.delete_prefix(&resources_prefix(disaster_id)).await;
    }

    async fn locate(&self, name: &str) -> Option<GeoPoint> {
        match self.geocoding.geocode(name).await {
            Ok(point) => Some(point),
            Err(e) => {
                warn!(location = %name, error = %e, "Failed to geocode resource location");
                None
            }
        }
    }
}
